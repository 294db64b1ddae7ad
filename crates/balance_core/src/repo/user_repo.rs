//! User point-balance repository.
//!
//! # Responsibility
//! - Expose the owner's point balance to the ledger and prize redemption.
//!
//! # Invariants
//! - `adjust_points` is a single atomic SQL update flooring at zero.
//! - `try_debit_points` never drives the balance negative; insufficient
//!   funds are reported, not clamped.
//! - Core never reads or writes any other user field.

use crate::model::task::UserId;
use crate::repo::task_repo::{ignore_no_rows, RepoError, RepoResult};
use rusqlite::{params, Connection};

/// Balance access shared by the completion ledger and prize redemption.
pub trait UserBalanceRepository {
    /// Registers a user with a zero balance.
    fn create_user(&self, id: UserId) -> RepoResult<()>;

    fn get_points(&self, id: UserId) -> RepoResult<i64>;

    /// Applies a signed delta atomically, flooring the result at zero.
    /// Returns the new balance.
    fn adjust_points(&self, id: UserId, delta: i64) -> RepoResult<i64>;

    /// Debits `amount` only if the balance covers it.
    ///
    /// Returns `Some(new_balance)` on success, `None` when funds are
    /// insufficient. The check and the debit are one SQL statement.
    fn try_debit_points(&self, id: UserId, amount: i64) -> RepoResult<Option<i64>>;
}

/// SQLite-backed balance repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl UserBalanceRepository for SqliteUserRepository<'_> {
    fn create_user(&self, id: UserId) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO users (id, current_points) VALUES (?1, 0);",
            [id.to_string()],
        )?;
        Ok(())
    }

    fn get_points(&self, id: UserId) -> RepoResult<i64> {
        let points = self
            .conn
            .query_row(
                "SELECT current_points FROM users WHERE id = ?1;",
                [id.to_string()],
                |row| row.get::<_, i64>(0),
            )
            .map(Some)
            .or_else(ignore_no_rows)?;

        points.ok_or(RepoError::UserNotFound(id))
    }

    fn adjust_points(&self, id: UserId, delta: i64) -> RepoResult<i64> {
        let changed = self.conn.execute(
            "UPDATE users
             SET current_points = MAX(current_points + ?2, 0)
             WHERE id = ?1;",
            params![id.to_string(), delta],
        )?;

        if changed == 0 {
            return Err(RepoError::UserNotFound(id));
        }

        self.get_points(id)
    }

    fn try_debit_points(&self, id: UserId, amount: i64) -> RepoResult<Option<i64>> {
        let changed = self.conn.execute(
            "UPDATE users
             SET current_points = current_points - ?2
             WHERE id = ?1 AND current_points >= ?2;",
            params![id.to_string(), amount],
        )?;

        if changed == 0 {
            // Distinguish "no such user" from "not enough points".
            self.get_points(id)?;
            return Ok(None);
        }

        Ok(Some(self.get_points(id)?))
    }
}
