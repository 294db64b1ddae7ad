//! Tag domain model.
//!
//! Tags label tasks for filtering; they never influence ordering or reset
//! behavior. Each tag belongs to exactly one user and names are unique per
//! owner.

use crate::model::task::UserId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-assigned identifier for a tag.
pub type TagId = i64;

/// Maximum tag name length in characters.
pub const TAG_NAME_MAX_CHARS: usize = 20;

/// Display color assigned when the caller supplies none.
pub const DEFAULT_TAG_COLOR: &str = "#6c757d";

/// Validation failure for tag names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagValidationError {
    EmptyName,
    NameTooLong { max: usize, actual: usize },
}

impl Display for TagValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "tag name cannot be empty"),
            Self::NameTooLong { max, actual } => {
                write!(f, "tag name is {actual} chars, max is {max}")
            }
        }
    }
}

impl Error for TagValidationError {}

/// Per-user label attached to tasks through the `task_tags` association.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub user_id: UserId,
    pub name: String,
    pub color: String,
}

/// Trims a tag name and checks its length contract.
pub fn validate_tag_name(name: &str) -> Result<String, TagValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(TagValidationError::EmptyName);
    }
    let chars = trimmed.chars().count();
    if chars > TAG_NAME_MAX_CHARS {
        return Err(TagValidationError::NameTooLong {
            max: TAG_NAME_MAX_CHARS,
            actual: chars,
        });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::{validate_tag_name, TagValidationError, TAG_NAME_MAX_CHARS};

    #[test]
    fn name_is_trimmed() {
        assert_eq!(validate_tag_name("  Work "), Ok("Work".to_string()));
    }

    #[test]
    fn blank_name_is_rejected() {
        assert_eq!(validate_tag_name("   "), Err(TagValidationError::EmptyName));
    }

    #[test]
    fn over_length_name_is_rejected() {
        let long = "x".repeat(TAG_NAME_MAX_CHARS + 1);
        assert!(matches!(
            validate_tag_name(&long),
            Err(TagValidationError::NameTooLong { .. })
        ));
    }
}
