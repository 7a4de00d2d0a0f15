//! Category reference data.
//!
//! Categories are read-only from the editor's point of view. An expense keeps a
//! point-in-time copy of the category name and icon it was tagged with.

use serde::Serialize;
use std::fmt::{Display, Formatter};

pub type CategoryId = i64;

/// Name of an icon resource understood by the presentation layer.
///
/// An empty name means "no icon resolved yet".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct IconRef(String);

impl IconRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn none() -> Self {
        Self(String::new())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_none(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for IconRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Expense classification row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub icon: IconRef,
    /// Sort priority. Higher values are listed first.
    pub order: i64,
}

impl Category {
    pub fn new(id: CategoryId, name: impl Into<String>, icon: IconRef, order: i64) -> Self {
        Self {
            id,
            name: name.into(),
            icon,
            order,
        }
    }
}
