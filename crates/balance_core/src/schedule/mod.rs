//! Recurring-task lifecycle engine.
//!
//! # Responsibility
//! - Compute cycle deadlines per frequency (`deadline`).
//! - Decide and apply cycle resets (`reset`).
//! - Order the presented task list deterministically (`priority`).
//!
//! # Invariants
//! - All calendar math uses day boundaries only; no timezone reasoning.
//! - Reset and ranking are pure over an injected clock value, never the
//!   ambient wall clock.

pub mod deadline;
pub mod priority;
pub mod reset;
