//! Built-in category seed data.

use crate::db::DbResult;
use crate::icon::BUILTIN_CATEGORIES;
use log::info;
use rusqlite::{params, Connection};

/// Inserts the built-in categories when the `categories` table is empty.
///
/// Returns the number of inserted rows (`0` when categories already exist).
pub fn seed_default_categories(conn: &mut Connection) -> DbResult<usize> {
    let existing: i64 = conn.query_row("SELECT count(*) FROM categories;", [], |row| row.get(0))?;
    if existing > 0 {
        return Ok(0);
    }

    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO categories (name, icon, category_order) VALUES (?1, ?2, ?3);",
        )?;
        for category in BUILTIN_CATEGORIES {
            stmt.execute(params![category.name, category.icon, category.order])?;
        }
    }
    tx.commit()?;

    info!(
        "event=category_seed module=db status=ok inserted={}",
        BUILTIN_CATEGORIES.len()
    );
    Ok(BUILTIN_CATEGORIES.len())
}
