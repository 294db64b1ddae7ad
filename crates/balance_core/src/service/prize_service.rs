//! Prize use-case service.
//!
//! # Responsibility
//! - Provide prize CRUD and point redemption.
//!
//! # Invariants
//! - Redemption debits the shared balance with the same atomic discipline
//!   as the completion ledger: check and debit are one conditional update.
//! - Insufficient funds are a discriminated outcome, not an error.

use crate::model::prize::{Prize, PrizeId, PrizeValidationError};
use crate::model::task::UserId;
use crate::repo::prize_repo::PrizeRepository;
use crate::repo::task_repo::{RepoError, RepoResult};
use crate::repo::user_repo::UserBalanceRepository;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for prize use-cases.
#[derive(Debug)]
pub enum PrizeServiceError {
    NotFound(PrizeId),
    Forbidden(PrizeId),
    Validation(PrizeValidationError),
    Repo(RepoError),
}

impl Display for PrizeServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "prize not found: {id}"),
            Self::Forbidden(id) => write!(f, "prize {id} belongs to a different user"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PrizeServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for PrizeServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::PrizeNotFound(id) => Self::NotFound(id),
            other => Self::Repo(other),
        }
    }
}

impl From<PrizeValidationError> for PrizeServiceError {
    fn from(value: PrizeValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Outcome of a redemption attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedeemOutcome {
    Redeemed { new_point_total: i64 },
    InsufficientPoints { current_points: i64, cost: i64 },
}

/// Prize service facade over prize and balance repositories.
pub struct PrizeService<P: PrizeRepository, B: UserBalanceRepository> {
    prizes: P,
    balances: B,
}

impl<P: PrizeRepository, B: UserBalanceRepository> PrizeService<P, B> {
    pub fn new(prizes: P, balances: B) -> Self {
        Self { prizes, balances }
    }

    /// Creates a validated prize for the given user.
    pub fn create_prize(
        &self,
        owner: UserId,
        title: impl Into<String>,
        description: Option<String>,
        cost: i64,
    ) -> Result<Prize, PrizeServiceError> {
        let prize = Prize::new(owner, title, description, cost)?;
        self.prizes.create_prize(&prize)?;
        info!(
            "event=prize_create module=service status=ok prize={} owner={owner} cost={cost}",
            prize.id
        );
        Ok(prize)
    }

    /// Lists the user's prizes, cheapest first.
    pub fn list_prizes(&self, owner: UserId) -> RepoResult<Vec<Prize>> {
        self.prizes.list_by_owner(owner)
    }

    /// Redeems a prize against the owner's point balance.
    pub fn redeem(
        &self,
        prize_id: PrizeId,
        owner: UserId,
    ) -> Result<RedeemOutcome, PrizeServiceError> {
        let prize = self
            .prizes
            .get_prize(prize_id)?
            .ok_or(PrizeServiceError::NotFound(prize_id))?;
        if prize.user_id != owner {
            return Err(PrizeServiceError::Forbidden(prize_id));
        }

        match self.balances.try_debit_points(owner, prize.cost)? {
            Some(new_point_total) => {
                info!(
                    "event=prize_redeem module=service status=ok prize={prize_id} owner={owner} cost={}",
                    prize.cost
                );
                Ok(RedeemOutcome::Redeemed { new_point_total })
            }
            None => {
                let current_points = self.balances.get_points(owner)?;
                Ok(RedeemOutcome::InsufficientPoints {
                    current_points,
                    cost: prize.cost,
                })
            }
        }
    }

    /// Deletes an owned prize.
    pub fn delete_prize(&self, prize_id: PrizeId, owner: UserId) -> Result<(), PrizeServiceError> {
        let prize = self
            .prizes
            .get_prize(prize_id)?
            .ok_or(PrizeServiceError::NotFound(prize_id))?;
        if prize.user_id != owner {
            return Err(PrizeServiceError::Forbidden(prize_id));
        }

        self.prizes.delete_prize(prize_id)?;
        info!("event=prize_delete module=service status=ok prize={prize_id} owner={owner}");
        Ok(())
    }
}
