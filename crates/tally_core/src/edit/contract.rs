//! Query and action contracts accepted by the expense editor.
//!
//! # Invariants
//! - Query ids are pairwise distinct; action ids are pairwise distinct.
//! - Every action's required arguments are declared by `required_args()` and
//!   checked by `EditAction::from_args` before any state is touched.

use crate::edit::error::ContractViolation;
use crate::model::category::{CategoryId, IconRef};
use std::collections::HashMap;
use std::fmt::{Display, Formatter};

/// Pull requests: data the editor loads from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditQuery {
    LoadExpense,
    LoadCategory,
}

impl EditQuery {
    const ALL: [Self; 2] = [Self::LoadExpense, Self::LoadCategory];

    pub fn all() -> &'static [Self] {
        &Self::ALL
    }

    pub fn id(self) -> u32 {
        match self {
            Self::LoadExpense => 1,
            Self::LoadCategory => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::LoadExpense => "load_expense",
            Self::LoadCategory => "load_category",
        }
    }
}

impl Display for EditQuery {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a push request, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditActionKind {
    /// Declared but reserved; delivering it is a no-op.
    Reload,
    SaveData,
    CategoryChanged,
    DateChanged,
    AmountChanged,
    DescChanged,
}

impl EditActionKind {
    const ALL: [Self; 6] = [
        Self::Reload,
        Self::SaveData,
        Self::CategoryChanged,
        Self::DateChanged,
        Self::AmountChanged,
        Self::DescChanged,
    ];

    pub fn all() -> &'static [Self] {
        &Self::ALL
    }

    pub fn id(self) -> u32 {
        match self {
            Self::Reload => 1,
            Self::SaveData => 2,
            Self::CategoryChanged => 3,
            Self::DateChanged => 4,
            Self::AmountChanged => 5,
            Self::DescChanged => 6,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Reload => "reload",
            Self::SaveData => "save_data",
            Self::CategoryChanged => "category_changed",
            Self::DateChanged => "date_changed",
            Self::AmountChanged => "amount_changed",
            Self::DescChanged => "desc_changed",
        }
    }

    /// Argument keys that must be present when the action arrives as `ActionArgs`.
    pub fn required_args(self) -> &'static [ArgKey] {
        match self {
            Self::Reload | Self::SaveData => &[],
            Self::CategoryChanged => &[
                ArgKey::ExpenseCategory,
                ArgKey::ExpenseCategoryId,
                ArgKey::ExpenseCategoryIcon,
            ],
            Self::DateChanged => &[ArgKey::ExpenseTime],
            Self::AmountChanged => &[ArgKey::ExpenseAmount],
            Self::DescChanged => &[ArgKey::ExpenseDesc],
        }
    }

    /// Whether the action completes synchronously (no store round trip).
    pub fn is_field_edit(self) -> bool {
        matches!(
            self,
            Self::CategoryChanged | Self::DateChanged | Self::AmountChanged | Self::DescChanged
        )
    }
}

impl Display for EditActionKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The query or action a callback reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditOrigin {
    Query(EditQuery),
    Action(EditActionKind),
}

impl Display for EditOrigin {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Query(query) => write!(f, "query:{query}"),
            Self::Action(action) => write!(f, "action:{action}"),
        }
    }
}

/// Typed action payload, one variant per action.
#[derive(Debug, Clone, PartialEq)]
pub enum EditAction {
    Reload,
    SaveData,
    CategoryChanged {
        category_id: CategoryId,
        category_name: String,
        category_icon: IconRef,
    },
    DateChanged {
        time: i64,
    },
    AmountChanged {
        amount: f64,
    },
    DescChanged {
        desc: String,
    },
}

impl EditAction {
    pub fn kind(&self) -> EditActionKind {
        match self {
            Self::Reload => EditActionKind::Reload,
            Self::SaveData => EditActionKind::SaveData,
            Self::CategoryChanged { .. } => EditActionKind::CategoryChanged,
            Self::DateChanged { .. } => EditActionKind::DateChanged,
            Self::AmountChanged { .. } => EditActionKind::AmountChanged,
            Self::DescChanged { .. } => EditActionKind::DescChanged,
        }
    }

    /// Builds a typed action from a dynamic argument bag.
    ///
    /// # Errors
    /// - `MissingArgument` when a key listed by `kind.required_args()` is absent.
    /// - `WrongArgumentType` when a present value has an unusable type.
    pub fn from_args(kind: EditActionKind, args: &ActionArgs) -> Result<Self, ContractViolation> {
        let action = match kind {
            EditActionKind::Reload => Self::Reload,
            EditActionKind::SaveData => Self::SaveData,
            EditActionKind::CategoryChanged => Self::CategoryChanged {
                category_name: args.require_text(kind, ArgKey::ExpenseCategory)?,
                category_id: args.require_int(kind, ArgKey::ExpenseCategoryId)?,
                category_icon: IconRef::new(args.require_text(kind, ArgKey::ExpenseCategoryIcon)?),
            },
            EditActionKind::DateChanged => Self::DateChanged {
                time: args.require_int(kind, ArgKey::ExpenseTime)?,
            },
            EditActionKind::AmountChanged => Self::AmountChanged {
                amount: args.require_number(kind, ArgKey::ExpenseAmount)?,
            },
            EditActionKind::DescChanged => Self::DescChanged {
                desc: args.require_text(kind, ArgKey::ExpenseDesc)?,
            },
        };
        Ok(action)
    }
}

/// Keys of the dynamic argument bag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgKey {
    ExpenseAmount,
    ExpenseCategory,
    ExpenseCategoryId,
    ExpenseCategoryIcon,
    ExpenseDesc,
    ExpenseTime,
}

impl ArgKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ExpenseAmount => "expense_amount",
            Self::ExpenseCategory => "expense_category",
            Self::ExpenseCategoryId => "expense_category_id",
            Self::ExpenseCategoryIcon => "expense_category_icon",
            Self::ExpenseDesc => "expense_desc",
            Self::ExpenseTime => "expense_time",
        }
    }
}

impl Display for ArgKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<i64> for ArgValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for ArgValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Dynamic argument bag for callers that assemble actions at runtime.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionArgs {
    values: HashMap<ArgKey, ArgValue>,
}

impl ActionArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: ArgKey, value: impl Into<ArgValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: ArgKey, value: impl Into<ArgValue>) {
        self.values.insert(key, value.into());
    }

    pub fn get(&self, key: ArgKey) -> Option<&ArgValue> {
        self.values.get(&key)
    }

    pub fn contains_key(&self, key: ArgKey) -> bool {
        self.values.contains_key(&key)
    }

    fn require(&self, action: EditActionKind, key: ArgKey) -> Result<&ArgValue, ContractViolation> {
        self.get(key)
            .ok_or(ContractViolation::MissingArgument { action, key })
    }

    // Integers are accepted where a number is expected.
    fn require_number(&self, action: EditActionKind, key: ArgKey) -> Result<f64, ContractViolation> {
        match self.require(action, key)? {
            ArgValue::Float(value) => Ok(*value),
            ArgValue::Int(value) => Ok(*value as f64),
            ArgValue::Text(_) => Err(wrong_type(action, key, "a number")),
        }
    }

    fn require_int(&self, action: EditActionKind, key: ArgKey) -> Result<i64, ContractViolation> {
        match self.require(action, key)? {
            ArgValue::Int(value) => Ok(*value),
            ArgValue::Float(_) | ArgValue::Text(_) => Err(wrong_type(action, key, "an integer")),
        }
    }

    fn require_text(&self, action: EditActionKind, key: ArgKey) -> Result<String, ContractViolation> {
        match self.require(action, key)? {
            ArgValue::Text(value) => Ok(value.clone()),
            ArgValue::Int(_) | ArgValue::Float(_) => Err(wrong_type(action, key, "text")),
        }
    }
}

fn wrong_type(action: EditActionKind, key: ArgKey, expected: &'static str) -> ContractViolation {
    ContractViolation::WrongArgumentType {
        action,
        key,
        expected,
    }
}
