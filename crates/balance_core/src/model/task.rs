//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical recurring/one-off task record.
//! - Enforce the completion-counter invariants shared by reset and ledger
//!   logic.
//!
//! # Invariants
//! - `completed_count` stays within `[0, required_count]`.
//! - `completed_at` is non-null exactly when `completed_count` equals
//!   `required_count`.
//! - `user_id` never changes after creation.

use crate::model::tag::Tag;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a task.
pub type TaskId = Uuid;

/// Stable identifier for a task owner.
pub type UserId = Uuid;

/// Maximum task title length in characters.
pub const TITLE_MAX_CHARS: usize = 50;

/// Maximum task description length in characters.
pub const DESCRIPTION_MAX_CHARS: usize = 500;

/// Recurrence category governing reset and deadline rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    /// Never resets automatically; carries an explicit due date.
    OneTime,
    /// Progress resets at every day boundary.
    Daily,
    /// Progress resets at every Monday boundary.
    Weekly,
}

/// Validation failure for task field and invariant checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    EmptyTitle,
    TitleTooLong { max: usize, actual: usize },
    DescriptionTooLong { max: usize, actual: usize },
    NonPositivePoints(i64),
    ZeroRequiredCount,
    CompletedCountOutOfRange { completed: u32, required: u32 },
    CompletionStampMismatch { completed: u32, required: u32 },
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "task title cannot be empty"),
            Self::TitleTooLong { max, actual } => {
                write!(f, "task title is {actual} chars, max is {max}")
            }
            Self::DescriptionTooLong { max, actual } => {
                write!(f, "task description is {actual} chars, max is {max}")
            }
            Self::NonPositivePoints(points) => {
                write!(f, "points per completion must be positive, got {points}")
            }
            Self::ZeroRequiredCount => write!(f, "required completion count must be positive"),
            Self::CompletedCountOutOfRange {
                completed,
                required,
            } => write!(
                f,
                "completed count {completed} is outside [0, {required}]"
            ),
            Self::CompletionStampMismatch {
                completed,
                required,
            } => write!(
                f,
                "completed_at must be set exactly when {completed} == {required}"
            ),
        }
    }
}

impl Error for TaskValidationError {}

/// Caller-supplied fields for creating or editing a task.
///
/// Identity, progress, and deadline fields are owned by core and never come
/// from the caller directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub points_per_click: i64,
    pub frequency: Frequency,
    pub required_count: u32,
}

impl TaskDraft {
    /// Rejects malformed input before any mutation happens.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        validate_fields(
            &self.title,
            self.description.as_deref(),
            self.points_per_click,
            self.required_count,
        )
    }
}

/// Canonical task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Stable global ID.
    pub id: TaskId,
    /// Owning user; immutable after creation.
    pub user_id: UserId,
    pub title: String,
    pub description: Option<String>,
    /// Points credited per completion click.
    pub points_per_click: i64,
    pub frequency: Frequency,
    /// Completion target for the current cycle.
    pub required_count: u32,
    /// Progress within the current cycle.
    pub completed_count: u32,
    /// Timestamp of the last progress or reset mutation.
    pub last_modified: NaiveDateTime,
    /// Moment the counter reached its target; cleared when it drops below.
    pub completed_at: Option<NaiveDateTime>,
    /// End of the current cycle; meaning depends on `frequency`.
    pub deadline: NaiveDateTime,
    /// Tag associations, used for filtering only. Loaded on request.
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl Task {
    /// Creates a fresh task from caller-supplied fields.
    ///
    /// Progress starts at zero; `deadline` comes from the deadline
    /// calculator, never from the caller raw.
    pub fn from_draft(
        user_id: UserId,
        draft: &TaskDraft,
        created_at: NaiveDateTime,
        deadline: NaiveDateTime,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: draft.title.clone(),
            description: draft.description.clone(),
            points_per_click: draft.points_per_click,
            frequency: draft.frequency,
            required_count: draft.required_count,
            completed_count: 0,
            last_modified: created_at,
            completed_at: None,
            deadline,
            tags: Vec::new(),
        }
    }

    /// Whether the current cycle's target has been reached.
    pub fn is_completed(&self) -> bool {
        self.completed_count >= self.required_count
    }

    /// Checks field constraints and the completion invariants.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        validate_fields(
            &self.title,
            self.description.as_deref(),
            self.points_per_click,
            self.required_count,
        )?;

        if self.completed_count > self.required_count {
            return Err(TaskValidationError::CompletedCountOutOfRange {
                completed: self.completed_count,
                required: self.required_count,
            });
        }

        let fully_done = self.completed_count == self.required_count;
        if self.completed_at.is_some() != fully_done {
            return Err(TaskValidationError::CompletionStampMismatch {
                completed: self.completed_count,
                required: self.required_count,
            });
        }

        Ok(())
    }
}

fn validate_fields(
    title: &str,
    description: Option<&str>,
    points_per_click: i64,
    required_count: u32,
) -> Result<(), TaskValidationError> {
    if title.trim().is_empty() {
        return Err(TaskValidationError::EmptyTitle);
    }
    let title_chars = title.chars().count();
    if title_chars > TITLE_MAX_CHARS {
        return Err(TaskValidationError::TitleTooLong {
            max: TITLE_MAX_CHARS,
            actual: title_chars,
        });
    }
    if let Some(description) = description {
        let description_chars = description.chars().count();
        if description_chars > DESCRIPTION_MAX_CHARS {
            return Err(TaskValidationError::DescriptionTooLong {
                max: DESCRIPTION_MAX_CHARS,
                actual: description_chars,
            });
        }
    }
    if points_per_click < 1 {
        return Err(TaskValidationError::NonPositivePoints(points_per_click));
    }
    if required_count == 0 {
        return Err(TaskValidationError::ZeroRequiredCount);
    }
    Ok(())
}
