//! Single-expense editor.
//!
//! # Responsibility
//! - Declare the query/action contracts a caller may issue.
//! - Own the expense under edit plus the category list used to populate it.
//! - Run store work off the caller's thread and report outcomes by callback.
//!
//! # Invariants
//! - Field edits are applied and reported synchronously.
//! - Loads and saves never block the caller.
//! - Missing action arguments are returned to the caller as a
//!   `ContractViolation`; they are never reported through `on_error`.

pub mod contract;
pub mod error;
pub mod executor;
pub mod model;
