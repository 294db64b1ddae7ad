//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls and the schedule engine into use-case
//!   level APIs.
//! - Keep presentation layers decoupled from storage details.
//!
//! # Invariants
//! - Every mutating operation verifies task ownership; mismatch is
//!   `Forbidden`, a missing id is `NotFound`.
//! - Input validation happens before any mutation.

pub mod ledger_service;
pub mod prize_service;
pub mod tag_service;
pub mod task_service;
