//! Prize domain model.
//!
//! Prizes are self-defined rewards redeemed against the point balance. They
//! share the balance with the completion ledger, so redemption must use the
//! same atomic balance-update discipline.

use crate::model::task::UserId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a prize.
pub type PrizeId = Uuid;

/// Maximum prize title length in characters.
pub const PRIZE_TITLE_MAX_CHARS: usize = 50;

/// Maximum prize description length in characters.
pub const PRIZE_DESCRIPTION_MAX_CHARS: usize = 200;

/// Validation failure for prize fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrizeValidationError {
    EmptyTitle,
    TitleTooLong { max: usize, actual: usize },
    DescriptionTooLong { max: usize, actual: usize },
    NonPositiveCost(i64),
}

impl Display for PrizeValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "prize title cannot be empty"),
            Self::TitleTooLong { max, actual } => {
                write!(f, "prize title is {actual} chars, max is {max}")
            }
            Self::DescriptionTooLong { max, actual } => {
                write!(f, "prize description is {actual} chars, max is {max}")
            }
            Self::NonPositiveCost(cost) => {
                write!(f, "prize cost must be at least 1 point, got {cost}")
            }
        }
    }
}

impl Error for PrizeValidationError {}

/// Self-defined reward redeemable for points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prize {
    pub id: PrizeId,
    pub user_id: UserId,
    pub title: String,
    pub description: Option<String>,
    pub cost: i64,
}

impl Prize {
    /// Builds a validated prize with a generated stable ID.
    pub fn new(
        user_id: UserId,
        title: impl Into<String>,
        description: Option<String>,
        cost: i64,
    ) -> Result<Self, PrizeValidationError> {
        let prize = Self {
            id: Uuid::new_v4(),
            user_id,
            title: title.into(),
            description,
            cost,
        };
        prize.validate()?;
        Ok(prize)
    }

    /// Checks field constraints.
    pub fn validate(&self) -> Result<(), PrizeValidationError> {
        if self.title.trim().is_empty() {
            return Err(PrizeValidationError::EmptyTitle);
        }
        let title_chars = self.title.chars().count();
        if title_chars > PRIZE_TITLE_MAX_CHARS {
            return Err(PrizeValidationError::TitleTooLong {
                max: PRIZE_TITLE_MAX_CHARS,
                actual: title_chars,
            });
        }
        if let Some(description) = self.description.as_deref() {
            let description_chars = description.chars().count();
            if description_chars > PRIZE_DESCRIPTION_MAX_CHARS {
                return Err(PrizeValidationError::DescriptionTooLong {
                    max: PRIZE_DESCRIPTION_MAX_CHARS,
                    actual: description_chars,
                });
            }
        }
        if self.cost < 1 {
            return Err(PrizeValidationError::NonPositiveCost(self.cost));
        }
        Ok(())
    }
}
