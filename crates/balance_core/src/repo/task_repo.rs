//! Task and template repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over `tasks` and read access to
//!   `predefined_tasks`.
//! - Own tag-link replacement (`set_task_tags`) with atomic semantics.
//!
//! # Invariants
//! - Write paths must call `Task::validate()` before SQL mutations.
//! - Read paths must reject invalid persisted state instead of masking it.
//! - Association loading is requested through the closed `TaskRelation`
//!   enum, never through free-form relation names.

use crate::db::DbError;
use crate::model::prize::PrizeId;
use crate::model::tag::{Tag, TagId};
use crate::model::task::{Frequency, Task, TaskId, TaskValidationError, UserId};
use crate::model::template::{PredefinedTask, TemplateId};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, Row, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const TASK_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    title,
    description,
    points_per_click,
    frequency,
    required_count,
    completed_count,
    last_modified,
    completed_at,
    deadline
FROM tasks";

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(TaskValidationError),
    Db(DbError),
    TaskNotFound(TaskId),
    TemplateNotFound(TemplateId),
    TagNotFound(TagId),
    PrizeNotFound(PrizeId),
    UserNotFound(UserId),
    /// The task exists but belongs to a different user.
    OwnerMismatch(TaskId),
    /// A conditional ledger update lost its compare-and-swap race.
    ConcurrentUpdate(TaskId),
    DuplicateTag(String),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::TemplateNotFound(id) => write!(f, "template not found: {id}"),
            Self::TagNotFound(id) => write!(f, "tag not found: {id}"),
            Self::PrizeNotFound(id) => write!(f, "prize not found: {id}"),
            Self::UserNotFound(id) => write!(f, "user not found: {id}"),
            Self::OwnerMismatch(id) => write!(f, "task {id} belongs to a different user"),
            Self::ConcurrentUpdate(id) => {
                write!(f, "task {id} was modified concurrently; state reloaded")
            }
            Self::DuplicateTag(name) => write!(f, "tag `{name}` already exists for this user"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TaskValidationError> for RepoError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Closed set of loadable task associations.
///
/// Replaces free-form "include this navigation property by name" requests
/// with an explicit typed projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskRelation {
    Tags,
}

/// Repository interface for task CRUD and template reads.
pub trait TaskRepository {
    fn create_task(&self, task: &Task) -> RepoResult<TaskId>;
    fn update_task(&self, task: &Task) -> RepoResult<()>;
    fn get_task(&self, id: TaskId, load: Option<TaskRelation>) -> RepoResult<Option<Task>>;
    fn list_by_owner(&self, owner: UserId, load: Option<TaskRelation>) -> RepoResult<Vec<Task>>;
    fn delete_task(&self, id: TaskId) -> RepoResult<()>;
    /// Replaces the full tag set for one task in a single transaction.
    fn set_task_tags(&mut self, id: TaskId, tag_ids: &[TagId]) -> RepoResult<()>;
    fn get_template(&self, id: TemplateId) -> RepoResult<Option<PredefinedTask>>;
    fn list_templates(&self) -> RepoResult<Vec<PredefinedTask>>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&self, task: &Task) -> RepoResult<TaskId> {
        task.validate()?;

        self.conn.execute(
            "INSERT INTO tasks (
                id,
                user_id,
                title,
                description,
                points_per_click,
                frequency,
                required_count,
                completed_count,
                last_modified,
                completed_at,
                deadline
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11);",
            params![
                task.id.to_string(),
                task.user_id.to_string(),
                task.title.as_str(),
                task.description.as_deref(),
                task.points_per_click,
                frequency_to_db(task.frequency),
                task.required_count,
                task.completed_count,
                datetime_to_ms(task.last_modified),
                task.completed_at.map(datetime_to_ms),
                datetime_to_ms(task.deadline),
            ],
        )?;

        Ok(task.id)
    }

    fn update_task(&self, task: &Task) -> RepoResult<()> {
        task.validate()?;

        // user_id is immutable and deliberately absent from the SET list.
        let changed = self.conn.execute(
            "UPDATE tasks
             SET
                title = ?1,
                description = ?2,
                points_per_click = ?3,
                frequency = ?4,
                required_count = ?5,
                completed_count = ?6,
                last_modified = ?7,
                completed_at = ?8,
                deadline = ?9
             WHERE id = ?10;",
            params![
                task.title.as_str(),
                task.description.as_deref(),
                task.points_per_click,
                frequency_to_db(task.frequency),
                task.required_count,
                task.completed_count,
                datetime_to_ms(task.last_modified),
                task.completed_at.map(datetime_to_ms),
                datetime_to_ms(task.deadline),
                task.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::TaskNotFound(task.id));
        }

        Ok(())
    }

    fn get_task(&self, id: TaskId, load: Option<TaskRelation>) -> RepoResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            let mut task = parse_task_row(row)?;
            if load == Some(TaskRelation::Tags) {
                task.tags = load_tags_for_task(self.conn, task.id)?;
            }
            return Ok(Some(task));
        }

        Ok(None)
    }

    fn list_by_owner(&self, owner: UserId, load: Option<TaskRelation>) -> RepoResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TASK_SELECT_SQL} WHERE user_id = ?1 ORDER BY last_modified DESC, id ASC;"
        ))?;

        let mut rows = stmt.query([owner.to_string()])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }

        if load == Some(TaskRelation::Tags) {
            for task in &mut tasks {
                task.tags = load_tags_for_task(self.conn, task.id)?;
            }
        }

        Ok(tasks)
    }

    fn delete_task(&self, id: TaskId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::TaskNotFound(id));
        }

        Ok(())
    }

    fn set_task_tags(&mut self, id: TaskId, tag_ids: &[TagId]) -> RepoResult<()> {
        let task_id_text = id.to_string();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let owner: Option<String> = tx
            .query_row(
                "SELECT user_id FROM tasks WHERE id = ?1;",
                [task_id_text.as_str()],
                |row| row.get(0),
            )
            .map(Some)
            .or_else(ignore_no_rows)?;
        let Some(owner) = owner else {
            return Err(RepoError::TaskNotFound(id));
        };

        tx.execute(
            "DELETE FROM task_tags WHERE task_id = ?1;",
            [task_id_text.as_str()],
        )?;

        for &tag_id in tag_ids {
            // Tags must belong to the same user as the task.
            let changed = tx.execute(
                "INSERT INTO task_tags (task_id, tag_id)
                 SELECT ?1, id
                 FROM tags
                 WHERE id = ?2 AND user_id = ?3;",
                params![task_id_text.as_str(), tag_id, owner.as_str()],
            )?;
            if changed == 0 {
                return Err(RepoError::TagNotFound(tag_id));
            }
        }

        tx.commit()?;
        Ok(())
    }

    fn get_template(&self, id: TemplateId) -> RepoResult<Option<PredefinedTask>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, description, points_per_click, frequency, required_count
             FROM predefined_tasks
             WHERE id = ?1;",
        )?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_template_row(row)?));
        }

        Ok(None)
    }

    fn list_templates(&self) -> RepoResult<Vec<PredefinedTask>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, description, points_per_click, frequency, required_count
             FROM predefined_tasks
             ORDER BY title ASC;",
        )?;

        let mut rows = stmt.query([])?;
        let mut templates = Vec::new();
        while let Some(row) = rows.next()? {
            templates.push(parse_template_row(row)?);
        }

        Ok(templates)
    }
}

pub(crate) fn frequency_to_db(frequency: Frequency) -> &'static str {
    match frequency {
        Frequency::OneTime => "one_time",
        Frequency::Daily => "daily",
        Frequency::Weekly => "weekly",
    }
}

pub(crate) fn parse_frequency(value: &str) -> Option<Frequency> {
    match value {
        "one_time" => Some(Frequency::OneTime),
        "daily" => Some(Frequency::Daily),
        "weekly" => Some(Frequency::Weekly),
        _ => None,
    }
}

pub(crate) fn datetime_to_ms(value: NaiveDateTime) -> i64 {
    value.and_utc().timestamp_millis()
}

pub(crate) fn datetime_from_ms(value: i64) -> RepoResult<NaiveDateTime> {
    chrono::DateTime::from_timestamp_millis(value)
        .map(|dt| dt.naive_utc())
        .ok_or_else(|| RepoError::InvalidData(format!("invalid timestamp `{value}`")))
}

pub(crate) fn parse_uuid(value: &str, context: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid `{value}` in {context}")))
}

pub(crate) fn ignore_no_rows<T>(err: rusqlite::Error) -> RepoResult<Option<T>> {
    match err {
        rusqlite::Error::QueryReturnedNoRows => Ok(None),
        other => Err(other.into()),
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let id_text: String = row.get("id")?;
    let user_text: String = row.get("user_id")?;
    let frequency_text: String = row.get("frequency")?;
    let frequency = parse_frequency(&frequency_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid frequency `{frequency_text}` in tasks.frequency"
        ))
    })?;

    let completed_at = match row.get::<_, Option<i64>>("completed_at")? {
        Some(value) => Some(datetime_from_ms(value)?),
        None => None,
    };

    let task = Task {
        id: parse_uuid(&id_text, "tasks.id")?,
        user_id: parse_uuid(&user_text, "tasks.user_id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        points_per_click: row.get("points_per_click")?,
        frequency,
        required_count: row.get("required_count")?,
        completed_count: row.get("completed_count")?,
        last_modified: datetime_from_ms(row.get("last_modified")?)?,
        completed_at,
        deadline: datetime_from_ms(row.get("deadline")?)?,
        tags: Vec::new(),
    };
    task.validate()?;
    Ok(task)
}

fn parse_template_row(row: &Row<'_>) -> RepoResult<PredefinedTask> {
    let id_text: String = row.get("id")?;
    let frequency_text: String = row.get("frequency")?;
    let frequency = parse_frequency(&frequency_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid frequency `{frequency_text}` in predefined_tasks.frequency"
        ))
    })?;

    Ok(PredefinedTask {
        id: parse_uuid(&id_text, "predefined_tasks.id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        points_per_click: row.get("points_per_click")?,
        frequency,
        required_count: row.get("required_count")?,
    })
}

pub(crate) fn load_tags_for_task(conn: &Connection, task_id: TaskId) -> RepoResult<Vec<Tag>> {
    let mut stmt = conn.prepare(
        "SELECT t.id, t.user_id, t.name, t.color
         FROM task_tags tt
         INNER JOIN tags t ON t.id = tt.tag_id
         WHERE tt.task_id = ?1
         ORDER BY t.name COLLATE NOCASE ASC;",
    )?;

    let mut rows = stmt.query([task_id.to_string()])?;
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
