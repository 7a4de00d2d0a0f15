//! Expense editing domain model.
//!
//! # Responsibility
//! - Define the record under edit (`Expense`) and its reference data (`Category`).
//! - Keep persisted identity rules in one place.
//!
//! # Invariants
//! - `Expense::id == 0` means the expense has never been persisted.
//! - `Expense::sync_id` is assigned once per in-memory expense and never replaced.

pub mod category;
pub mod expense;
