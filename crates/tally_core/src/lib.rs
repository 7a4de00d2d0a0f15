//! Core of the tally expense editor.
//!
//! Hosts the single-expense editing orchestrator together with the SQLite
//! store it edits against. Presentation layers drive it through
//! `ExpenseEditModel` and receive outcomes via `EditCallback`.

pub mod db;
pub mod edit;
pub mod icon;
pub mod logging;
pub mod model;
pub mod store;

pub use edit::contract::{
    ActionArgs, ArgKey, ArgValue, EditAction, EditActionKind, EditOrigin, EditQuery,
};
pub use edit::error::{ContractViolation, EditError, ErrorCode};
pub use edit::executor::EditExecutor;
pub use edit::model::{EditCallback, EditSnapshot, ExpenseEditModel};
pub use icon::{BuiltinIconResolver, IconResolver};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::category::{Category, CategoryId, IconRef};
pub use model::expense::{Expense, ExpenseId, UNSAVED_EXPENSE_ID};
pub use store::{ExpenseRow, NewExpenseRow, SqliteTallyStore, StoreError, StoreResult, TallyStore};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
