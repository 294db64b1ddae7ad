//! Domain model for the Balance task/point tracker.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Enforce per-record invariants via `validate()` before persistence.
//!
//! # Invariants
//! - Every task/template/prize is identified by a stable UUID.
//! - `completed_at` is non-null exactly when a task's progress counter has
//!   reached its target.

pub mod prize;
pub mod tag;
pub mod task;
pub mod template;
