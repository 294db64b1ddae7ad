//! Predefined task templates.
//!
//! A template is an immutable, unowned task definition. Importing one copies
//! its fields into a new owned task; the copy keeps no reference back to the
//! template.

use crate::model::task::Frequency;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a template.
pub type TemplateId = Uuid;

/// Unowned task definition used as a creation seed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredefinedTask {
    pub id: TemplateId,
    pub title: String,
    pub description: Option<String>,
    pub points_per_click: i64,
    pub frequency: Frequency,
    pub required_count: u32,
}
