//! Tag use-case service.
//!
//! Tags are simple per-user labels; none of the scheduling logic depends on
//! them. Names are trimmed and length-checked before any mutation.

use crate::model::tag::{validate_tag_name, Tag, TagId, TagValidationError, DEFAULT_TAG_COLOR};
use crate::model::task::UserId;
use crate::repo::tag_repo::TagRepository;
use crate::repo::task_repo::{RepoError, RepoResult};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for tag use-cases.
#[derive(Debug)]
pub enum TagServiceError {
    Validation(TagValidationError),
    Duplicate(String),
    NotFound(TagId),
    Forbidden(TagId),
    Repo(RepoError),
}

impl Display for TagServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Duplicate(name) => write!(f, "tag `{name}` already exists"),
            Self::NotFound(id) => write!(f, "tag not found: {id}"),
            Self::Forbidden(id) => write!(f, "tag {id} belongs to a different user"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TagServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for TagServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::TagNotFound(id) => Self::NotFound(id),
            RepoError::DuplicateTag(name) => Self::Duplicate(name),
            other => Self::Repo(other),
        }
    }
}

impl From<TagValidationError> for TagServiceError {
    fn from(value: TagValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Tag service facade over repository implementations.
pub struct TagService<R: TagRepository> {
    repo: R,
}

impl<R: TagRepository> TagService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a tag for the given user.
    ///
    /// Blank/over-length names and duplicates are rejected; a missing color
    /// falls back to the default.
    pub fn create_tag(
        &self,
        owner: UserId,
        name: &str,
        color: Option<&str>,
    ) -> Result<Tag, TagServiceError> {
        let name = validate_tag_name(name)?;
        let color = match color {
            Some(value) if !value.trim().is_empty() => value.trim(),
            _ => DEFAULT_TAG_COLOR,
        };

        let tag = self.repo.create_tag(owner, &name, color)?;
        info!(
            "event=tag_create module=service status=ok tag={} owner={owner}",
            tag.id
        );
        Ok(tag)
    }

    /// Lists the user's tags sorted by name.
    pub fn list_tags(&self, owner: UserId) -> RepoResult<Vec<Tag>> {
        self.repo.list_tags(owner)
    }

    /// Deletes an owned tag; its task links cascade away in storage.
    pub fn delete_tag(&self, tag_id: TagId, owner: UserId) -> Result<(), TagServiceError> {
        let tag = self
            .repo
            .get_tag(tag_id)?
            .ok_or(TagServiceError::NotFound(tag_id))?;
        if tag.user_id != owner {
            return Err(TagServiceError::Forbidden(tag_id));
        }

        self.repo.delete_tag(tag_id)?;
        info!("event=tag_delete module=service status=ok tag={tag_id} owner={owner}");
        Ok(())
    }
}
