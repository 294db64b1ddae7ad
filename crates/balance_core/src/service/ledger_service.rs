//! Completion ledger use-case service.
//!
//! # Responsibility
//! - Expose toggle/revert to the presentation layer and shape the
//!   post-operation state for display.
//!
//! # Invariants
//! - Saturated operations (toggle at max, revert at zero) are successful
//!   no-ops returning the unchanged state.
//! - `completed_at` is rendered as `%a, %H:%M` or an empty string.

use crate::clock::Clock;
use crate::model::task::{TaskId, UserId};
use crate::repo::ledger_repo::{LedgerSnapshot, LedgerStore};
use crate::repo::task_repo::RepoError;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Display format for the completion moment, e.g. `Mon, 09:30`.
pub const COMPLETED_AT_FORMAT: &str = "%a, %H:%M";

/// Service error for ledger use-cases.
#[derive(Debug)]
pub enum LedgerError {
    NotFound(TaskId),
    Forbidden(TaskId),
    /// The conditional update lost its race; the caller may retry.
    Concurrent(TaskId),
    Repo(RepoError),
}

impl Display for LedgerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::Forbidden(id) => write!(f, "task {id} belongs to a different user"),
            Self::Concurrent(id) => write!(f, "task {id} was modified concurrently"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for LedgerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for LedgerError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::TaskNotFound(id) => Self::NotFound(id),
            RepoError::OwnerMismatch(id) => Self::Forbidden(id),
            RepoError::ConcurrentUpdate(id) => Self::Concurrent(id),
            other => Self::Repo(other),
        }
    }
}

/// Post-operation state returned to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerResult {
    pub completed_count: u32,
    pub required_count: u32,
    pub is_completed: bool,
    /// Formatted completion moment, empty when the task is not complete.
    pub completed_at: String,
    pub new_point_total: i64,
}

impl From<LedgerSnapshot> for LedgerResult {
    fn from(snapshot: LedgerSnapshot) -> Self {
        Self {
            is_completed: snapshot.completed_count >= snapshot.required_count,
            completed_at: snapshot
                .completed_at
                .map(|at| at.format(COMPLETED_AT_FORMAT).to_string())
                .unwrap_or_default(),
            completed_count: snapshot.completed_count,
            required_count: snapshot.required_count,
            new_point_total: snapshot.new_point_total,
        }
    }
}

/// Ledger service facade over the transactional store.
pub struct LedgerService<S: LedgerStore, C: Clock> {
    store: S,
    clock: C,
}

impl<S: LedgerStore, C: Clock> LedgerService<S, C> {
    pub fn new(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    /// Advances the completion counter by one and credits points.
    pub fn toggle(&mut self, task_id: TaskId, owner: UserId) -> Result<LedgerResult, LedgerError> {
        let snapshot = self.store.toggle(task_id, owner, self.clock.now())?;
        info!(
            "event=ledger_toggle module=service status=ok task={task_id} owner={owner} count={}/{}",
            snapshot.completed_count, snapshot.required_count
        );
        Ok(snapshot.into())
    }

    /// Rewinds the completion counter by one and debits points.
    pub fn revert(&mut self, task_id: TaskId, owner: UserId) -> Result<LedgerResult, LedgerError> {
        let snapshot = self.store.revert(task_id, owner, self.clock.now())?;
        info!(
            "event=ledger_revert module=service status=ok task={task_id} owner={owner} count={}/{}",
            snapshot.completed_count, snapshot.required_count
        );
        Ok(snapshot.into())
    }
}
