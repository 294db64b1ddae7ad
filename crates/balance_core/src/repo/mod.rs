//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository writes must enforce model `validate()` before persistence.
//! - Repository APIs return semantic errors (`TaskNotFound`,
//!   `OwnerMismatch`) in addition to DB transport errors.
//! - Every mutation touching both a task and its owner's balance happens
//!   inside one transaction.

pub mod ledger_repo;
pub mod prize_repo;
pub mod tag_repo;
pub mod task_repo;
pub mod user_repo;
