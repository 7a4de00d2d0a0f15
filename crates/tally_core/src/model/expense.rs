//! Expense record under edit.
//!
//! # Responsibility
//! - Define the canonical expense shape shared by store and editor.
//! - Provide identity helpers (`is_persisted`, sync id generation).
//!
//! # Invariants
//! - `id == 0` means not yet persisted; positive ids come from the store.
//! - `category_name`/`category_icon` are a snapshot, not a live join.

use crate::model::category::{Category, CategoryId, IconRef};
use serde::Serialize;
use uuid::Uuid;

pub type ExpenseId = i64;

/// Id carried by an expense that has never been saved.
pub const UNSAVED_EXPENSE_ID: ExpenseId = 0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub amount: f64,
    pub category_id: CategoryId,
    pub category_name: String,
    pub category_icon: IconRef,
    pub desc: String,
    /// Unix epoch milliseconds.
    pub time: i64,
    /// Opaque cross-device identity, empty until assigned.
    pub sync_id: String,
}

impl Expense {
    /// Creates an empty expense that has not been persisted.
    pub fn new_unsaved() -> Self {
        Self::with_id(UNSAVED_EXPENSE_ID)
    }

    /// Creates an empty expense addressed by `id`.
    ///
    /// Used when the editor opens an existing row; the remaining fields are
    /// filled by the first load.
    pub fn with_id(id: ExpenseId) -> Self {
        Self {
            id,
            amount: 0.0,
            category_id: 0,
            category_name: String::new(),
            category_icon: IconRef::none(),
            desc: String::new(),
            time: 0,
            sync_id: String::new(),
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id > 0
    }

    /// Copies the category identity, name and icon onto this expense.
    pub fn tag_with(&mut self, category: &Category) {
        self.category_id = category.id;
        self.category_name = category.name.clone();
        self.category_icon = category.icon.clone();
    }
}

impl Default for Expense {
    fn default() -> Self {
        Self::new_unsaved()
    }
}

/// Generates a fresh opaque sync identity.
pub fn generate_sync_id() -> String {
    Uuid::new_v4().to_string()
}

/// Current wall-clock time in Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
