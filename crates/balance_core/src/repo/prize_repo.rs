//! Prize repository contracts and SQLite implementation.

use crate::model::prize::{Prize, PrizeId};
use crate::model::task::UserId;
use crate::repo::task_repo::{parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

/// Repository interface for per-user prize CRUD.
pub trait PrizeRepository {
    fn create_prize(&self, prize: &Prize) -> RepoResult<PrizeId>;
    fn get_prize(&self, id: PrizeId) -> RepoResult<Option<Prize>>;
    fn list_by_owner(&self, owner: UserId) -> RepoResult<Vec<Prize>>;
    fn delete_prize(&self, id: PrizeId) -> RepoResult<()>;
}

/// SQLite-backed prize repository.
pub struct SqlitePrizeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePrizeRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl PrizeRepository for SqlitePrizeRepository<'_> {
    fn create_prize(&self, prize: &Prize) -> RepoResult<PrizeId> {
        prize
            .validate()
            .map_err(|err| RepoError::InvalidData(err.to_string()))?;

        self.conn.execute(
            "INSERT INTO prizes (id, user_id, title, description, cost)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                prize.id.to_string(),
                prize.user_id.to_string(),
                prize.title.as_str(),
                prize.description.as_deref(),
                prize.cost,
            ],
        )?;

        Ok(prize.id)
    }

    fn get_prize(&self, id: PrizeId) -> RepoResult<Option<Prize>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, title, description, cost FROM prizes WHERE id = ?1;",
        )?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_prize_row(row)?));
        }
        Ok(None)
    }

    fn list_by_owner(&self, owner: UserId) -> RepoResult<Vec<Prize>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, title, description, cost
             FROM prizes
             WHERE user_id = ?1
             ORDER BY cost ASC, title ASC;",
        )?;

        let mut rows = stmt.query([owner.to_string()])?;
        let mut prizes = Vec::new();
        while let Some(row) = rows.next()? {
            prizes.push(parse_prize_row(row)?);
        }
        Ok(prizes)
    }

    fn delete_prize(&self, id: PrizeId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM prizes WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::PrizeNotFound(id));
        }
        Ok(())
    }
}

fn parse_prize_row(row: &Row<'_>) -> RepoResult<Prize> {
    let id_text: String = row.get("id")?;
    let user_text: String = row.get("user_id")?;
    Ok(Prize {
        id: parse_uuid(&id_text, "prizes.id")?,
        user_id: parse_uuid(&user_text, "prizes.user_id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        cost: row.get("cost")?,
    })
}
