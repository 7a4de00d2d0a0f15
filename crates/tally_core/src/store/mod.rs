//! Store adapter contracts consumed by the expense editor.
//!
//! # Responsibility
//! - Define the query/insert/update surface over `categories` and `expenses`.
//! - Keep SQL details behind the `TallyStore` boundary.
//!
//! # Invariants
//! - `Err(_)` means the store was unavailable; "nothing found" is `Ok(None)` or
//!   an empty list, never an error.
//! - Category listings are ordered by `order` descending, ties by id ascending.

use crate::db::DbError;
use crate::model::category::{Category, CategoryId};
use crate::model::expense::{Expense, ExpenseId};
use std::error::Error;
use std::fmt::{Display, Formatter};

mod sqlite_store;

pub use sqlite_store::SqliteTallyStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure reported by a store adapter or by the task running it.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    /// The backing connection cannot be used (e.g. a poisoned lock).
    Unavailable(String),
    /// A persisted row could not be mapped back into the domain model.
    InvalidData(String),
    /// The worker task running the store call panicked or was cancelled.
    TaskFailed(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Unavailable(message) => write!(f, "store unavailable: {message}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::TaskFailed(message) => write!(f, "store task failed: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Unavailable(_) | Self::InvalidData(_) | Self::TaskFailed(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Column values written by every expense save.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseRow {
    pub amount: f64,
    pub category_id: CategoryId,
    pub category_name: String,
    pub desc: String,
    pub time: i64,
}

impl ExpenseRow {
    pub fn from_expense(expense: &Expense) -> Self {
        Self {
            amount: expense.amount,
            category_id: expense.category_id,
            category_name: expense.category_name.clone(),
            desc: expense.desc.clone(),
            time: expense.time,
        }
    }
}

/// Insert payload: the regular columns plus the one-time sync identity.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpenseRow {
    pub row: ExpenseRow,
    pub sync_id: String,
}

impl NewExpenseRow {
    pub fn from_expense(expense: &Expense) -> Self {
        Self {
            row: ExpenseRow::from_expense(expense),
            sync_id: expense.sync_id.clone(),
        }
    }
}

/// Store primitives used by the editor. Calls are blocking; the editor runs
/// them on the executor's worker pool.
pub trait TallyStore: Send + Sync + 'static {
    /// All categories, highest `order` first.
    fn list_categories(&self) -> StoreResult<Vec<Category>>;
    /// The single category with the highest `order`, if any.
    fn first_place_category(&self) -> StoreResult<Option<Category>>;
    fn get_expense(&self, id: ExpenseId) -> StoreResult<Option<Expense>>;
    /// Inserts a new expense and returns the generated id. Ids `<= 0` signal failure.
    fn insert_expense(&self, row: &NewExpenseRow) -> StoreResult<ExpenseId>;
    /// Overwrites the expense keyed by `id` and returns the affected row count.
    fn update_expense(&self, id: ExpenseId, row: &ExpenseRow) -> StoreResult<usize>;
}
