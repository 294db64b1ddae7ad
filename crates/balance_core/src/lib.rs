//! Core domain logic for Balance, a personal gamification tracker.
//!
//! This crate is the single source of truth for business invariants:
//! recurrence resets, deadline calculation, priority ranking, and the
//! completion ledger that keeps task progress and the point balance in
//! step. Presentation layers consume the service facades and never touch
//! SQL directly.
//!
//! Layering, outermost first:
//! - `service`: use-case facades (tasks, ledger, tags, prizes).
//! - `schedule`: pure calendar math (reset, deadline, priority).
//! - `repo`: storage contracts and their SQLite implementations.
//! - `model`: validated domain types.
//! - `db`: connection bootstrap, migrations, template seeding.

pub mod clock;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod schedule;
pub mod service;

pub use clock::{Clock, FixedClock, SystemClock};

pub use model::prize::{Prize, PrizeId, PrizeValidationError};
pub use model::tag::{Tag, TagId, TagValidationError, DEFAULT_TAG_COLOR};
pub use model::task::{
    Frequency, Task, TaskDraft, TaskId, TaskValidationError, UserId, DESCRIPTION_MAX_CHARS,
    TITLE_MAX_CHARS,
};
pub use model::template::{PredefinedTask, TemplateId};

pub use db::{open_db, open_db_in_memory, DbError, DbResult};

pub use repo::ledger_repo::{LedgerSnapshot, LedgerStore, SqliteLedgerStore};
pub use repo::prize_repo::{PrizeRepository, SqlitePrizeRepository};
pub use repo::tag_repo::{SqliteTagRepository, TagRepository};
pub use repo::task_repo::{
    RepoError, RepoResult, SqliteTaskRepository, TaskRelation, TaskRepository,
};
pub use repo::user_repo::{SqliteUserRepository, UserBalanceRepository};

pub use schedule::priority::{SortMode, TaskFilter};

pub use service::ledger_service::{LedgerError, LedgerResult, LedgerService, COMPLETED_AT_FORMAT};
pub use service::prize_service::{PrizeService, PrizeServiceError, RedeemOutcome};
pub use service::tag_service::{TagService, TagServiceError};
pub use service::task_service::{TaskListing, TaskService, TaskServiceError};

pub use logging::{default_log_level, init_logging, logging_status};

/// Returns the core crate version for diagnostics and log headers.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
