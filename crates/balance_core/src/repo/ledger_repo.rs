//! Completion ledger persistence.
//!
//! # Responsibility
//! - Apply toggle/revert as one transaction over the task row and its
//!   owner's point balance.
//!
//! # Invariants
//! - Task mutation and balance mutation commit together or not at all.
//! - The task update is conditional on the expected prior
//!   `completed_count`; a lost race surfaces as `ConcurrentUpdate` instead
//!   of a silent lost update.
//! - The balance never goes below zero, even from inconsistent prior state.

use crate::model::task::{TaskId, UserId};
use crate::repo::task_repo::{ignore_no_rows, parse_uuid, RepoError, RepoResult};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, Transaction, TransactionBehavior};

use super::task_repo::{datetime_from_ms, datetime_to_ms};

/// Post-operation ledger state for one task and its owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerSnapshot {
    pub completed_count: u32,
    pub required_count: u32,
    pub completed_at: Option<NaiveDateTime>,
    pub new_point_total: i64,
}

/// Atomic toggle/revert operations over (task, owner balance).
pub trait LedgerStore {
    /// Advances the completion counter by one, crediting points.
    ///
    /// Saturates silently at the required count: the unchanged state is
    /// returned without touching task or balance.
    fn toggle(
        &mut self,
        task_id: TaskId,
        owner: UserId,
        now: NaiveDateTime,
    ) -> RepoResult<LedgerSnapshot>;

    /// Rewinds the completion counter by one, debiting points (floored at
    /// zero). Saturates silently at zero.
    fn revert(
        &mut self,
        task_id: TaskId,
        owner: UserId,
        now: NaiveDateTime,
    ) -> RepoResult<LedgerSnapshot>;
}

/// SQLite-backed ledger store.
pub struct SqliteLedgerStore<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteLedgerStore<'conn> {
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }
}

struct TaskState {
    completed_count: u32,
    required_count: u32,
    points_per_click: i64,
    completed_at: Option<NaiveDateTime>,
}

impl LedgerStore for SqliteLedgerStore<'_> {
    fn toggle(
        &mut self,
        task_id: TaskId,
        owner: UserId,
        now: NaiveDateTime,
    ) -> RepoResult<LedgerSnapshot> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let state = read_task_state(&tx, task_id, owner)?;
        let balance = read_balance(&tx, owner)?;

        if state.completed_count >= state.required_count {
            // Saturated: no-op, current state echoed back.
            tx.commit()?;
            return Ok(LedgerSnapshot {
                completed_count: state.completed_count,
                required_count: state.required_count,
                completed_at: state.completed_at,
                new_point_total: balance,
            });
        }

        let new_count = state.completed_count + 1;
        let completed_at = if new_count >= state.required_count {
            Some(now)
        } else {
            None
        };

        let changed = tx.execute(
            "UPDATE tasks
             SET
                completed_count = ?2,
                last_modified = ?3,
                completed_at = ?4
             WHERE id = ?1 AND completed_count = ?5;",
            params![
                task_id.to_string(),
                new_count,
                datetime_to_ms(now),
                completed_at.map(datetime_to_ms),
                state.completed_count,
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::ConcurrentUpdate(task_id));
        }

        tx.execute(
            "UPDATE users
             SET current_points = current_points + ?2
             WHERE id = ?1;",
            params![owner.to_string(), state.points_per_click],
        )?;

        let new_point_total = read_balance(&tx, owner)?;
        tx.commit()?;

        Ok(LedgerSnapshot {
            completed_count: new_count,
            required_count: state.required_count,
            completed_at,
            new_point_total,
        })
    }

    fn revert(
        &mut self,
        task_id: TaskId,
        owner: UserId,
        now: NaiveDateTime,
    ) -> RepoResult<LedgerSnapshot> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let state = read_task_state(&tx, task_id, owner)?;
        let balance = read_balance(&tx, owner)?;

        if state.completed_count == 0 {
            tx.commit()?;
            return Ok(LedgerSnapshot {
                completed_count: 0,
                required_count: state.required_count,
                completed_at: state.completed_at,
                new_point_total: balance,
            });
        }

        // After the decrement the counter sits below the target, so the
        // completion stamp is always cleared.
        let new_count = state.completed_count - 1;

        let changed = tx.execute(
            "UPDATE tasks
             SET
                completed_count = ?2,
                last_modified = ?3,
                completed_at = NULL
             WHERE id = ?1 AND completed_count = ?4;",
            params![
                task_id.to_string(),
                new_count,
                datetime_to_ms(now),
                state.completed_count,
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::ConcurrentUpdate(task_id));
        }

        tx.execute(
            "UPDATE users
             SET current_points = MAX(current_points - ?2, 0)
             WHERE id = ?1;",
            params![owner.to_string(), state.points_per_click],
        )?;

        let new_point_total = read_balance(&tx, owner)?;
        tx.commit()?;

        Ok(LedgerSnapshot {
            completed_count: new_count,
            required_count: state.required_count,
            completed_at: None,
            new_point_total,
        })
    }
}

fn read_task_state(tx: &Transaction<'_>, task_id: TaskId, owner: UserId) -> RepoResult<TaskState> {
    let row = tx
        .query_row(
            "SELECT user_id, completed_count, required_count, points_per_click, completed_at
             FROM tasks
             WHERE id = ?1;",
            [task_id.to_string()],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, u32>(1)?,
                    row.get::<_, u32>(2)?,
                    row.get::<_, i64>(3)?,
                    row.get::<_, Option<i64>>(4)?,
                ))
            },
        )
        .map(Some)
        .or_else(ignore_no_rows)?;

    let Some((owner_text, completed_count, required_count, points_per_click, completed_at_ms)) =
        row
    else {
        return Err(RepoError::TaskNotFound(task_id));
    };

    if parse_uuid(&owner_text, "tasks.user_id")? != owner {
        return Err(RepoError::OwnerMismatch(task_id));
    }

    let completed_at = match completed_at_ms {
        Some(value) => Some(datetime_from_ms(value)?),
        None => None,
    };

    Ok(TaskState {
        completed_count,
        required_count,
        points_per_click,
        completed_at,
    })
}

fn read_balance(tx: &Transaction<'_>, owner: UserId) -> RepoResult<i64> {
    let balance = tx
        .query_row(
            "SELECT current_points FROM users WHERE id = ?1;",
            [owner.to_string()],
            |row| row.get::<_, i64>(0),
        )
        .map(Some)
        .or_else(ignore_no_rows)?;

    balance.ok_or(RepoError::UserNotFound(owner))
}
