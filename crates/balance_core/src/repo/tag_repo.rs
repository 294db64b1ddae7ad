//! Tag repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Tag names are unique per owner; duplicates surface as `DuplicateTag`.
//! - Deleting a tag cascades its task links at the storage boundary.

use crate::model::tag::{Tag, TagId};
use crate::model::task::UserId;
use crate::repo::task_repo::{ignore_no_rows, parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection};

/// Repository interface for per-user tag CRUD.
pub trait TagRepository {
    fn create_tag(&self, owner: UserId, name: &str, color: &str) -> RepoResult<Tag>;
    fn get_tag(&self, id: TagId) -> RepoResult<Option<Tag>>;
    fn list_tags(&self, owner: UserId) -> RepoResult<Vec<Tag>>;
    fn delete_tag(&self, id: TagId) -> RepoResult<()>;
}

/// SQLite-backed tag repository.
pub struct SqliteTagRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTagRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TagRepository for SqliteTagRepository<'_> {
    fn create_tag(&self, owner: UserId, name: &str, color: &str) -> RepoResult<Tag> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM tags WHERE user_id = ?1 AND name = ?2 COLLATE NOCASE
            );",
            params![owner.to_string(), name],
            |row| row.get(0),
        )?;
        if exists == 1 {
            return Err(RepoError::DuplicateTag(name.to_string()));
        }

        self.conn.execute(
            "INSERT INTO tags (user_id, name, color) VALUES (?1, ?2, ?3);",
            params![owner.to_string(), name, color],
        )?;

        Ok(Tag {
            id: self.conn.last_insert_rowid(),
            user_id: owner,
            name: name.to_string(),
            color: color.to_string(),
        })
    }

    fn get_tag(&self, id: TagId) -> RepoResult<Option<Tag>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, user_id, name, color FROM tags WHERE id = ?1;",
                [id],
                |row| {
                    Ok((
                        row.get::<_, TagId>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .map(Some)
            .or_else(ignore_no_rows)?;

        match row {
            Some((id, user_text, name, color)) => Ok(Some(Tag {
                id,
                user_id: parse_uuid(&user_text, "tags.user_id")?,
                name,
                color,
            })),
            None => Ok(None),
        }
    }

    fn list_tags(&self, owner: UserId) -> RepoResult<Vec<Tag>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, name, color
             FROM tags
             WHERE user_id = ?1
             ORDER BY name COLLATE NOCASE ASC;",
        )?;

        let mut rows = stmt.query([owner.to_string()])?;
        let mut tags = Vec::new();
        while let Some(row) = rows.next()? {
            let user_text: String = row.get("user_id")?;
            tags.push(Tag {
                id: row.get("id")?,
                user_id: parse_uuid(&user_text, "tags.user_id")?,
                name: row.get("name")?,
                color: row.get("color")?,
            });
        }
        Ok(tags)
    }

    fn delete_tag(&self, id: TagId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM tags WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::TagNotFound(id));
        }
        Ok(())
    }
}
