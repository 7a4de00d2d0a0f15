//! Editor error types.
//!
//! Two classes are kept apart:
//! - `ContractViolation`: the caller issued an action without a required
//!   argument. Returned immediately, never retried.
//! - `EditError`: a recoverable operational failure delivered via
//!   `EditCallback::on_error`.

use crate::edit::contract::{ArgKey, EditActionKind};
use crate::model::expense::ExpenseId;
use crate::store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Caller-visible error code for operational failures.
///
/// Every operational failure currently maps to `Unknown`; `EditError` keeps
/// the precise cause for logs and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Unknown,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
        }
    }
}

/// Recoverable failure of a query or save.
///
/// Owned editor state is left untouched when one of these is reported.
#[derive(Debug)]
pub enum EditError {
    /// The store returned no result (connection, SQL or worker failure).
    StoreUnavailable(StoreError),
    /// The expense being edited no longer exists.
    ExpenseNotFound(ExpenseId),
    /// A new expense cannot be defaulted because no category exists.
    NoCategory,
    /// The store reported a non-positive id for a save.
    InvalidSavedId(ExpenseId),
}

impl EditError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::StoreUnavailable(_)
            | Self::ExpenseNotFound(_)
            | Self::NoCategory
            | Self::InvalidSavedId(_) => ErrorCode::Unknown,
        }
    }

    /// Stable short name of the failure cause, safe for logs.
    pub fn cause(&self) -> &'static str {
        match self {
            Self::StoreUnavailable(_) => "store_unavailable",
            Self::ExpenseNotFound(_) => "expense_not_found",
            Self::NoCategory => "no_category",
            Self::InvalidSavedId(_) => "invalid_saved_id",
        }
    }
}

impl Display for EditError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StoreUnavailable(err) => write!(f, "{err}"),
            Self::ExpenseNotFound(id) => write!(f, "expense not found: {id}"),
            Self::NoCategory => f.write_str("no category available for a new expense"),
            Self::InvalidSavedId(id) => write!(f, "store returned invalid expense id {id}"),
        }
    }
}

impl Error for EditError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::StoreUnavailable(err) => Some(err),
            Self::ExpenseNotFound(_) | Self::NoCategory | Self::InvalidSavedId(_) => None,
        }
    }
}

impl From<StoreError> for EditError {
    fn from(value: StoreError) -> Self {
        Self::StoreUnavailable(value)
    }
}

/// Caller bug: an action was issued without a usable required argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractViolation {
    MissingArgument {
        action: EditActionKind,
        key: ArgKey,
    },
    WrongArgumentType {
        action: EditActionKind,
        key: ArgKey,
        expected: &'static str,
    },
}

impl Display for ContractViolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingArgument { action, key } => {
                write!(f, "{action} is missing required argument `{key}`")
            }
            Self::WrongArgumentType {
                action,
                key,
                expected,
            } => write!(f, "{action} argument `{key}` must be {expected}"),
        }
    }
}

impl Error for ContractViolation {}
