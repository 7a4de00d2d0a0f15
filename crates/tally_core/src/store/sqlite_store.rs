//! SQLite implementation of `TallyStore`.
//!
//! # Invariants
//! - One connection is shared by all clones; calls are serialized by its lock.
//! - Loaded expenses take their icon from the current category row, or an
//!   empty icon when that category no longer exists.

use super::{ExpenseRow, NewExpenseRow, StoreError, StoreResult, TallyStore};
use crate::db::{open_db, open_db_in_memory, seed_default_categories};
use crate::model::category::{Category, CategoryId, IconRef};
use crate::model::expense::{Expense, ExpenseId};
use rusqlite::{params, Connection, Row};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

const CATEGORY_SELECT_SQL: &str = "SELECT
    id,
    name,
    icon,
    category_order
FROM categories
ORDER BY category_order DESC, id ASC";

const EXPENSE_SELECT_SQL: &str = "SELECT
    e.id AS id,
    e.amount AS amount,
    e.category_id AS category_id,
    e.category AS category,
    COALESCE(c.icon, '') AS icon,
    e.description AS description,
    e.time AS time,
    e.sync_id AS sync_id
FROM expenses e
LEFT JOIN categories c ON c.id = e.category_id";

/// SQLite-backed store shared between the editor and its worker tasks.
#[derive(Clone)]
pub struct SqliteTallyStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteTallyStore {
    /// Wraps an already migrated connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Opens (or creates) a database file and applies migrations.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }

    /// Seeds the built-in categories into an empty database.
    pub fn seed_default_categories(&self) -> StoreResult<usize> {
        let mut conn = self.lock()?;
        Ok(seed_default_categories(&mut conn)?)
    }

    /// Adds one category row and returns its id.
    pub fn insert_category(&self, name: &str, icon: &IconRef, order: i64) -> StoreResult<CategoryId> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO categories (name, icon, category_order) VALUES (?1, ?2, ?3);",
            params![name, icon.as_str(), order],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Unavailable("connection lock poisoned".to_string()))
    }
}

impl TallyStore for SqliteTallyStore {
    fn list_categories(&self) -> StoreResult<Vec<Category>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(CATEGORY_SELECT_SQL)?;
        let mut rows = stmt.query([])?;
        let mut categories = Vec::new();

        while let Some(row) = rows.next()? {
            categories.push(parse_category_row(row)?);
        }

        Ok(categories)
    }

    fn first_place_category(&self) -> StoreResult<Option<Category>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!("{CATEGORY_SELECT_SQL} LIMIT 1;"))?;
        let mut rows = stmt.query([])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_category_row(row)?));
        }

        Ok(None)
    }

    fn get_expense(&self, id: ExpenseId) -> StoreResult<Option<Expense>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!("{EXPENSE_SELECT_SQL} WHERE e.id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_expense_row(row)?));
        }

        Ok(None)
    }

    fn insert_expense(&self, new_row: &NewExpenseRow) -> StoreResult<ExpenseId> {
        let conn = self.lock()?;
        let row = &new_row.row;
        conn.execute(
            "INSERT INTO expenses (
                amount,
                category_id,
                category,
                description,
                time,
                sync_id
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                row.amount,
                row.category_id,
                row.category_name.as_str(),
                row.desc.as_str(),
                row.time,
                new_row.sync_id.as_str(),
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    fn update_expense(&self, id: ExpenseId, row: &ExpenseRow) -> StoreResult<usize> {
        let conn = self.lock()?;
        let changed = conn.execute(
            "UPDATE expenses
             SET
                amount = ?1,
                category_id = ?2,
                category = ?3,
                description = ?4,
                time = ?5
             WHERE id = ?6;",
            params![
                row.amount,
                row.category_id,
                row.category_name.as_str(),
                row.desc.as_str(),
                row.time,
                id,
            ],
        )?;

        Ok(changed)
    }
}

fn parse_category_row(row: &Row<'_>) -> StoreResult<Category> {
    let name: String = row.get("name")?;
    if name.trim().is_empty() {
        return Err(StoreError::InvalidData(
            "empty category name in categories.name".to_string(),
        ));
    }

    Ok(Category {
        id: row.get("id")?,
        name,
        icon: IconRef::new(row.get::<_, String>("icon")?),
        order: row.get("category_order")?,
    })
}

fn parse_expense_row(row: &Row<'_>) -> StoreResult<Expense> {
    let id: ExpenseId = row.get("id")?;
    if id <= 0 {
        return Err(StoreError::InvalidData(format!(
            "non-positive id `{id}` in expenses.id"
        )));
    }

    Ok(Expense {
        id,
        amount: row.get("amount")?,
        category_id: row.get("category_id")?,
        category_name: row.get("category")?,
        category_icon: IconRef::new(row.get::<_, String>("icon")?),
        desc: row.get("description")?,
        time: row.get("time")?,
        sync_id: row.get("sync_id")?,
    })
}
