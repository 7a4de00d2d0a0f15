//! Tally command-line driver.
//!
//! # Responsibility
//! - Drive the expense editor end to end against a SQLite file.
//! - Print editor state as JSON for quick local checks.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::debug;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tally_core::{
    default_log_level, init_logging, ActionArgs, ArgKey, BuiltinIconResolver, Category,
    EditAction, EditActionKind, EditCallback, EditError, EditExecutor, EditOrigin, EditQuery,
    EditSnapshot, ExpenseEditModel, ExpenseId, SqliteTallyStore, UNSAVED_EXPENSE_ID,
};

#[derive(Parser)]
#[command(name = "tally", version, about = "Create and edit tally expenses")]
struct Cli {
    /// SQLite database file; created and seeded on first use.
    #[arg(long, env = "TALLY_DB", default_value = "tally.db")]
    db: PathBuf,
    /// Absolute directory for rotating log files. Logging is off when unset.
    #[arg(long, env = "TALLY_LOG_DIR")]
    log_dir: Option<String>,
    #[arg(long, default_value_t = default_log_level().to_string())]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List categories, highest priority first.
    Categories,
    /// Print one expense.
    Show { id: ExpenseId },
    /// Create an expense; unset fields take the new-expense defaults.
    New(FieldArgs),
    /// Change fields of an existing expense.
    Edit {
        id: ExpenseId,
        #[command(flatten)]
        fields: FieldArgs,
    },
}

#[derive(Args)]
struct FieldArgs {
    #[arg(long)]
    amount: Option<f64>,
    /// Category name, matched case-insensitively.
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    desc: Option<String>,
    /// Unix epoch milliseconds.
    #[arg(long)]
    time: Option<i64>,
}

/// Collects the first operational failure reported by the editor.
#[derive(Default)]
struct CliCallback {
    failure: Mutex<Option<String>>,
}

impl CliCallback {
    fn check(&self) -> Result<()> {
        let failure = self
            .failure
            .lock()
            .map_err(|_| anyhow!("callback state poisoned"))?
            .take();
        match failure {
            Some(message) => bail!(message),
            None => Ok(()),
        }
    }
}

impl EditCallback for CliCallback {
    fn on_model_updated(&self, _snapshot: &EditSnapshot, origin: EditOrigin) {
        debug!("event=cli_update module=cli status=ok origin={origin}");
    }

    fn on_error(&self, origin: EditOrigin, error: EditError) {
        if let Ok(mut failure) = self.failure.lock() {
            failure.get_or_insert_with(|| format!("{origin} failed: {error}"));
        }
    }
}

struct Session {
    model: ExpenseEditModel<SqliteTallyStore, BuiltinIconResolver>,
    state: Arc<CliCallback>,
    callback: Arc<dyn EditCallback>,
}

impl Session {
    fn open(store: SqliteTallyStore, expense_id: ExpenseId) -> Result<Self> {
        let executor = EditExecutor::try_current()?;
        let state = Arc::new(CliCallback::default());
        let callback: Arc<dyn EditCallback> = state.clone();
        Ok(Self {
            model: ExpenseEditModel::new(store, BuiltinIconResolver, executor, expense_id),
            state,
            callback,
        })
    }

    async fn query(&self, query: EditQuery) -> Result<()> {
        self.model
            .request_data(query, Arc::clone(&self.callback))
            .await?;
        self.state.check()
    }

    async fn apply(&self, fields: &FieldArgs) -> Result<()> {
        for (kind, args) in field_actions(fields, &self.model.categories())? {
            self.model
                .deliver_user_action_args(kind, &args, Arc::clone(&self.callback))?;
        }
        if let Some(save) = self
            .model
            .deliver_user_action(EditAction::SaveData, Arc::clone(&self.callback))
        {
            save.await?;
        }
        self.state.check()
    }
}

fn field_actions(
    fields: &FieldArgs,
    categories: &[Category],
) -> Result<Vec<(EditActionKind, ActionArgs)>> {
    let mut actions = Vec::new();
    if let Some(amount) = fields.amount {
        actions.push((
            EditActionKind::AmountChanged,
            ActionArgs::new().with(ArgKey::ExpenseAmount, amount),
        ));
    }
    if let Some(name) = &fields.category {
        let category = categories
            .iter()
            .find(|category| category.name.eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| anyhow!("unknown category `{name}`"))?;
        actions.push((
            EditActionKind::CategoryChanged,
            ActionArgs::new()
                .with(ArgKey::ExpenseCategory, category.name.as_str())
                .with(ArgKey::ExpenseCategoryId, category.id)
                .with(ArgKey::ExpenseCategoryIcon, category.icon.as_str()),
        ));
    }
    if let Some(desc) = &fields.desc {
        actions.push((
            EditActionKind::DescChanged,
            ActionArgs::new().with(ArgKey::ExpenseDesc, desc.as_str()),
        ));
    }
    if let Some(time) = fields.time {
        actions.push((
            EditActionKind::DateChanged,
            ActionArgs::new().with(ArgKey::ExpenseTime, time),
        ));
    }
    Ok(actions)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        init_logging(&cli.log_level, log_dir).map_err(|err| anyhow!(err))?;
    }

    let store = SqliteTallyStore::open(&cli.db)
        .with_context(|| format!("failed to open `{}`", cli.db.display()))?;
    store.seed_default_categories()?;

    let output = match cli.command {
        Command::Categories => {
            let session = Session::open(store, UNSAVED_EXPENSE_ID)?;
            session.query(EditQuery::LoadCategory).await?;
            serde_json::to_string_pretty(&session.model.categories())?
        }
        Command::Show { id } => {
            if id <= 0 {
                bail!("expense id must be positive, got {id}");
            }
            let session = Session::open(store, id)?;
            session.query(EditQuery::LoadExpense).await?;
            serde_json::to_string_pretty(&session.model.expense())?
        }
        Command::New(fields) => {
            let session = Session::open(store, UNSAVED_EXPENSE_ID)?;
            session.query(EditQuery::LoadCategory).await?;
            session.query(EditQuery::LoadExpense).await?;
            session.apply(&fields).await?;
            serde_json::to_string_pretty(&session.model.expense())?
        }
        Command::Edit { id, fields } => {
            if id <= 0 {
                bail!("expense id must be positive, got {id}");
            }
            let session = Session::open(store, id)?;
            session.query(EditQuery::LoadCategory).await?;
            session.query(EditQuery::LoadExpense).await?;
            session.apply(&fields).await?;
            serde_json::to_string_pretty(&session.model.expense())?
        }
    };

    println!("{output}");
    Ok(())
}
