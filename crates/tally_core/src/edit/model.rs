//! Expense editor orchestrator.
//!
//! # Responsibility
//! - Own one `Expense` and the ordered category list used to populate it.
//! - Dispatch loads and saves to the store through `EditExecutor`.
//! - Apply field edits in place and report every outcome to an `EditCallback`.
//!
//! # Invariants
//! - All reads and writes of owned state go through one mutex; loads swap
//!   whole values, so callbacks never observe a half-replaced list or record.
//! - Callbacks run after the lock is released and receive a snapshot of the
//!   state as it was right after the mutation.
//! - A failed query or save leaves owned state unchanged.
//! - A save never changes a positive id; `sync_id` is generated once and kept.
//! - At most one insert is issued per editor: saves of an unsaved expense are
//!   serialized, and later ones update the row the first insert created.
//! - No ordering is enforced between overlapping async requests: the last
//!   completion wins.
//! - Completions hold only a weak reference to owned state. If the editor has
//!   been dropped, late completions are logged and discarded without invoking
//!   the callback.

use crate::edit::contract::{ActionArgs, EditAction, EditActionKind, EditOrigin, EditQuery};
use crate::edit::error::{ContractViolation, EditError};
use crate::edit::executor::EditExecutor;
use crate::icon::IconResolver;
use crate::model::category::Category;
use crate::model::expense::{generate_sync_id, now_epoch_ms, Expense, ExpenseId};
use crate::store::{ExpenseRow, NewExpenseRow, StoreResult, TallyStore};
use log::{debug, info, warn};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::task::JoinHandle;

/// Receives the outcome of every query and action.
///
/// Async outcomes arrive on a runtime worker thread, not the caller's thread.
pub trait EditCallback: Send + Sync {
    /// Called after a successful query or action, once state is applied.
    fn on_model_updated(&self, snapshot: &EditSnapshot, origin: EditOrigin);
    /// Called when a query or save fails for a recoverable reason.
    fn on_error(&self, origin: EditOrigin, error: EditError);
}

/// Point-in-time copy of the editor's owned state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditSnapshot {
    pub expense: Expense,
    pub categories: Vec<Category>,
}

#[derive(Debug)]
struct EditState {
    expense: Expense,
    categories: Vec<Category>,
}

impl EditState {
    fn snapshot(&self) -> EditSnapshot {
        EditSnapshot {
            expense: self.expense.clone(),
            categories: self.categories.clone(),
        }
    }
}

type SharedState = Arc<Mutex<EditState>>;
type WeakState = Weak<Mutex<EditState>>;
/// Id assigned by this editor's insert, if one has completed in the store.
type InsertGate = Arc<Mutex<Option<ExpenseId>>>;

/// Editor for a single expense.
///
/// Construct with `expense_id == 0` to create a new expense, or with the id
/// of an existing one to edit it.
pub struct ExpenseEditModel<S: TallyStore, I: IconResolver> {
    store: Arc<S>,
    icons: Arc<I>,
    executor: EditExecutor,
    state: SharedState,
    inserted_id: InsertGate,
}

impl<S: TallyStore, I: IconResolver> ExpenseEditModel<S, I> {
    pub fn new(store: S, icons: I, executor: EditExecutor, expense_id: ExpenseId) -> Self {
        Self::with_shared(Arc::new(store), Arc::new(icons), executor, expense_id)
    }

    /// Same as `new`, for collaborators already shared with other components.
    pub fn with_shared(
        store: Arc<S>,
        icons: Arc<I>,
        executor: EditExecutor,
        expense_id: ExpenseId,
    ) -> Self {
        Self {
            store,
            icons,
            executor,
            state: Arc::new(Mutex::new(EditState {
                expense: Expense::with_id(expense_id),
                categories: Vec::new(),
            })),
            inserted_id: Arc::new(Mutex::new(None)),
        }
    }

    pub fn queries(&self) -> &'static [EditQuery] {
        EditQuery::all()
    }

    pub fn user_actions(&self) -> &'static [EditActionKind] {
        EditActionKind::all()
    }

    pub fn expense(&self) -> Expense {
        lock_state(&self.state).expense.clone()
    }

    pub fn categories(&self) -> Vec<Category> {
        lock_state(&self.state).categories.clone()
    }

    pub fn snapshot(&self) -> EditSnapshot {
        lock_state(&self.state).snapshot()
    }

    /// Starts an async load and returns immediately.
    ///
    /// The returned handle resolves after the callback has run; callers may
    /// drop it.
    pub fn request_data(&self, query: EditQuery, callback: Arc<dyn EditCallback>) -> JoinHandle<()> {
        info!("event=edit_query module=edit status=start query={query}");
        match query {
            EditQuery::LoadCategory => self.load_categories(callback),
            EditQuery::LoadExpense => {
                let expense_id = lock_state(&self.state).expense.id;
                if expense_id == 0 {
                    self.load_new_expense_defaults(callback)
                } else {
                    self.load_existing_expense(expense_id, callback)
                }
            }
        }
    }

    /// Validates a dynamic argument bag, then delivers the action.
    ///
    /// # Errors
    /// Returns `ContractViolation` when a required argument is missing or has
    /// the wrong type. No state is mutated and no callback fires in that case.
    pub fn deliver_user_action_args(
        &self,
        kind: EditActionKind,
        args: &ActionArgs,
        callback: Arc<dyn EditCallback>,
    ) -> Result<Option<JoinHandle<()>>, ContractViolation> {
        let action = EditAction::from_args(kind, args).inspect_err(|violation| {
            warn!(
                "event=edit_action module=edit status=rejected action={kind} error_code=contract_violation error={violation}"
            );
        })?;
        Ok(self.deliver_user_action(action, callback))
    }

    /// Applies a user action.
    ///
    /// Field edits mutate state and call back before returning (`None`).
    /// `SaveData` returns the handle of the in-flight save. `Reload` is a no-op.
    pub fn deliver_user_action(
        &self,
        action: EditAction,
        callback: Arc<dyn EditCallback>,
    ) -> Option<JoinHandle<()>> {
        let kind = action.kind();
        let origin = EditOrigin::Action(kind);

        let snapshot = {
            let mut state = lock_state(&self.state);
            match action {
                EditAction::Reload => {
                    debug!("event=edit_action module=edit status=skipped action={kind}");
                    return None;
                }
                EditAction::SaveData => {
                    let expense = state.expense.clone();
                    drop(state);
                    return Some(self.save_expense(expense, callback));
                }
                EditAction::AmountChanged { amount } => state.expense.amount = amount,
                EditAction::CategoryChanged {
                    category_id,
                    category_name,
                    category_icon,
                } => {
                    state.expense.category_id = category_id;
                    state.expense.category_name = category_name;
                    state.expense.category_icon = category_icon;
                }
                EditAction::DescChanged { desc } => state.expense.desc = desc,
                EditAction::DateChanged { time } => state.expense.time = time,
            }
            state.snapshot()
        };

        debug!("event=edit_action module=edit status=ok action={kind}");
        callback.on_model_updated(&snapshot, origin);
        None
    }

    /// Releases editor resources. In-flight requests keep running.
    pub fn clean_up(&self) {
        debug!("event=edit_clean_up module=edit status=ok");
    }

    fn load_categories(&self, callback: Arc<dyn EditCallback>) -> JoinHandle<()> {
        let origin = EditOrigin::Query(EditQuery::LoadCategory);
        let store = Arc::clone(&self.store);
        let state = Arc::downgrade(&self.state);

        self.executor.execute(
            "list_categories",
            move || store.list_categories(),
            move |result| {
                let outcome = result.map_err(EditError::from).map(|categories| {
                    move |state: &mut EditState| state.categories = categories
                });
                complete(&state, origin, callback.as_ref(), outcome);
            },
        )
    }

    fn load_new_expense_defaults(&self, callback: Arc<dyn EditCallback>) -> JoinHandle<()> {
        let origin = EditOrigin::Query(EditQuery::LoadExpense);
        let store = Arc::clone(&self.store);
        let state = Arc::downgrade(&self.state);

        self.executor.execute(
            "first_place_category",
            move || store.first_place_category(),
            move |result| {
                let outcome = match result {
                    Ok(Some(category)) => Ok(move |state: &mut EditState| {
                        apply_new_expense_defaults(&mut state.expense, &category)
                    }),
                    Ok(None) => Err(EditError::NoCategory),
                    Err(err) => Err(EditError::from(err)),
                };
                complete(&state, origin, callback.as_ref(), outcome);
            },
        )
    }

    fn load_existing_expense(
        &self,
        expense_id: ExpenseId,
        callback: Arc<dyn EditCallback>,
    ) -> JoinHandle<()> {
        let origin = EditOrigin::Query(EditQuery::LoadExpense);
        let store = Arc::clone(&self.store);
        let state = Arc::downgrade(&self.state);

        self.executor.execute(
            "get_expense",
            move || store.get_expense(expense_id),
            move |result| {
                let outcome = match result {
                    Ok(Some(expense)) => Ok(move |state: &mut EditState| state.expense = expense),
                    Ok(None) => Err(EditError::ExpenseNotFound(expense_id)),
                    Err(err) => Err(EditError::from(err)),
                };
                complete(&state, origin, callback.as_ref(), outcome);
            },
        )
    }

    fn save_expense(&self, expense: Expense, callback: Arc<dyn EditCallback>) -> JoinHandle<()> {
        let origin = EditOrigin::Action(EditActionKind::SaveData);
        let store = Arc::clone(&self.store);
        let icons = Arc::clone(&self.icons);
        let state = Arc::downgrade(&self.state);
        let inserted_id = Arc::clone(&self.inserted_id);

        self.executor.execute(
            "save_expense",
            move || persist_expense(store.as_ref(), &inserted_id, &expense),
            move |result| {
                let outcome = match result {
                    Ok(saved_id) if saved_id > 0 => {
                        info!("event=expense_save module=edit status=ok expense_id={saved_id}");
                        Ok(move |state: &mut EditState| {
                            adopt_saved_id(&mut state.expense, saved_id);
                            state.expense.category_icon =
                                icons.resolve(&state.expense.category_name);
                        })
                    }
                    Ok(saved_id) => Err(EditError::InvalidSavedId(saved_id)),
                    Err(err) => Err(EditError::from(err)),
                };
                complete(&state, origin, callback.as_ref(), outcome);
            },
        )
    }
}

/// Writes `expense` and returns the id it is stored under.
///
/// Updates are last-write-wins; the affected-row count is only logged. An
/// unsaved expense is inserted once; the gate stays locked across the insert
/// so an overlapping save updates the new row instead of inserting again.
fn persist_expense<S: TallyStore + ?Sized>(
    store: &S,
    inserted_id: &Mutex<Option<ExpenseId>>,
    expense: &Expense,
) -> StoreResult<ExpenseId> {
    if expense.is_persisted() {
        return update_expense(store, expense.id, expense);
    }

    let mut inserted = inserted_id.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(id) = *inserted {
        return update_expense(store, id, expense);
    }
    let id = store.insert_expense(&NewExpenseRow::from_expense(expense))?;
    if id > 0 {
        *inserted = Some(id);
    }
    Ok(id)
}

fn update_expense<S: TallyStore + ?Sized>(
    store: &S,
    id: ExpenseId,
    expense: &Expense,
) -> StoreResult<ExpenseId> {
    let changed = store.update_expense(id, &ExpenseRow::from_expense(expense))?;
    debug!("event=expense_update module=edit status=ok expense_id={id} changed={changed}");
    Ok(id)
}

/// Records the id a save stored the expense under. A positive id already
/// held by the expense is kept.
fn adopt_saved_id(expense: &mut Expense, saved_id: ExpenseId) {
    if expense.is_persisted() && expense.id != saved_id {
        warn!(
            "event=expense_save module=edit status=conflict expense_id={} saved_id={saved_id}",
            expense.id
        );
        return;
    }
    expense.id = saved_id;
}

fn apply_new_expense_defaults(expense: &mut Expense, category: &Category) {
    expense.amount = 0.0;
    expense.time = now_epoch_ms();
    expense.tag_with(category);
    if expense.sync_id.is_empty() {
        expense.sync_id = generate_sync_id();
    }
}

/// Applies a successful outcome to live state and notifies the caller, or
/// reports the failure. Does nothing once the editor has been dropped.
fn complete<F>(
    state: &WeakState,
    origin: EditOrigin,
    callback: &dyn EditCallback,
    outcome: Result<F, EditError>,
) where
    F: FnOnce(&mut EditState),
{
    let Some(state) = state.upgrade() else {
        debug!("event=edit_complete module=edit status=dropped origin={origin} reason=model_released");
        return;
    };

    match outcome {
        Ok(mutate) => {
            let snapshot = {
                let mut guard = lock_state(&state);
                mutate(&mut guard);
                guard.snapshot()
            };
            drop(state);
            info!("event=edit_complete module=edit status=ok origin={origin}");
            callback.on_model_updated(&snapshot, origin);
        }
        Err(error) => {
            drop(state);
            warn!(
                "event=edit_complete module=edit status=error origin={origin} error_code={} cause={}",
                error.code().as_str(),
                error.cause()
            );
            callback.on_error(origin, error);
        }
    }
}

// Loads swap whole values, so state behind a poisoned lock is still consistent.
fn lock_state(state: &Mutex<EditState>) -> MutexGuard<'_, EditState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::adopt_saved_id;
    use crate::model::expense::Expense;

    #[test]
    fn saved_id_is_adopted_by_unsaved_expense() {
        let mut expense = Expense::new_unsaved();
        adopt_saved_id(&mut expense, 12);
        assert_eq!(expense.id, 12);
    }

    #[test]
    fn persisted_id_is_never_reassigned() {
        let mut expense = Expense::with_id(5);
        adopt_saved_id(&mut expense, 9);
        assert_eq!(expense.id, 5);
    }
}
