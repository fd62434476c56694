use std::cmp::Ordering;
use std::env;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;
use synk_core::models::{BucketItem, CalendarEntry, Chore, Completable, Entry, ShoppingItem};
use synk_core::{
    BootstrapOutcome, HttpRemote, LocalStore, PushOutcome, Session, SyncSettings, SyncState,
};

use crate::error::CliError;

pub const DB_PATH_ENV: &str = "SYNK_DB_PATH";

/// Everything a document command needs to open a session.
pub struct CliContext {
    pub db_path: PathBuf,
    pub settings: SyncSettings,
}

impl CliContext {
    pub const fn new(db_path: PathBuf, settings: SyncSettings) -> Self {
        Self { db_path, settings }
    }
}

pub fn resolve_db_path(cli_db_path: Option<PathBuf>) -> PathBuf {
    cli_db_path
        .or_else(|| env::var_os(DB_PATH_ENV).map(PathBuf::from))
        .unwrap_or_else(default_db_path)
}

fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("synk")
        .join("synk.db")
}

/// Open the local store, attach the remote if configured, and reconcile.
pub async fn open_session(context: &CliContext) -> Result<Session<HttpRemote>, CliError> {
    let store = open_store(&context.db_path)?;
    let remote = if context.settings.is_configured() {
        Some(HttpRemote::new(&context.settings)?)
    } else {
        None
    };

    let mut session = Session::open(store, remote, &context.settings)?;
    let outcome = session.bootstrap().await;
    match outcome {
        BootstrapOutcome::Disabled => eprintln!("Warning: {}", CliError::SyncUnavailable),
        BootstrapOutcome::Rejected => {
            eprintln!("Warning: remote record is not a valid document; keeping local copy");
        }
        _ => tracing::debug!(?outcome, "Session ready"),
    }
    Ok(session)
}

fn open_store(path: &Path) -> Result<LocalStore, CliError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(LocalStore::open(path)?)
}

/// Push anything still pending before the process exits.
pub async fn finish_session(session: &mut Session<HttpRemote>) {
    if session.flush().await == PushOutcome::Failed {
        eprintln!("Warning: could not reach the remote; change saved locally only");
    }
}

/// Join free-text arguments, rejecting blank input.
pub fn join_text(parts: &[String], what: &'static str) -> Result<String, CliError> {
    let text = parts.join(" ");
    let text = text.trim();
    if text.is_empty() {
        Err(CliError::EmptyText(what))
    } else {
        Ok(text.to_string())
    }
}

pub fn short_id(entry: &impl Entry) -> String {
    entry.id().as_str().chars().take(13).collect()
}

/// Open entries first, otherwise in stored order.
pub fn done_last<'a, T: Completable + 'a>(entries: impl Iterator<Item = &'a T>) -> Vec<&'a T> {
    let mut entries = entries.collect::<Vec<_>>();
    entries.sort_by_key(|entry| entry.is_done());
    entries
}

/// Calendar entries by date, all-day plans before timed ones.
pub fn calendar_in_order<'a>(
    entries: impl Iterator<Item = &'a CalendarEntry>,
    on_date: Option<NaiveDate>,
) -> Vec<&'a CalendarEntry> {
    let mut entries = entries
        .filter(|entry| on_date.is_none_or(|date| entry.date == date))
        .collect::<Vec<_>>();
    entries.sort_by(|left, right| compare_calendar(left, right));
    entries
}

fn compare_calendar(left: &CalendarEntry, right: &CalendarEntry) -> Ordering {
    left.date
        .cmp(&right.date)
        .then_with(|| left.time.cmp(&right.time))
}

fn checkbox(done: bool) -> &'static str {
    if done {
        "[x]"
    } else {
        "[ ]"
    }
}

pub fn format_calendar_line(entry: &CalendarEntry) -> String {
    let time = entry
        .time
        .map_or_else(|| "all day".to_string(), |time| time.format("%H:%M").to_string());
    let mut line = format!(
        "{:<13}  {}  {time:<10}  {:<5}  {}",
        short_id(entry),
        entry.date.format("%Y-%m-%d"),
        entry.person.as_str(),
        entry.title
    );
    if !entry.notes.is_empty() {
        let _ = write!(line, "  ({})", entry.notes);
    }
    line
}

pub fn format_shopping_line(item: &ShoppingItem) -> String {
    let mut line = format!("{:<13}  {}  {}", short_id(item), checkbox(item.done), item.label);
    if !item.quantity.is_empty() {
        let _ = write!(line, "  {}", item.quantity);
    }
    if !item.category.is_empty() {
        let _ = write!(line, "  [{}]", item.category);
    }
    line
}

pub fn format_bucket_line(item: &BucketItem) -> String {
    format!(
        "{:<13}  {}  {}  ({})",
        short_id(item),
        checkbox(item.done),
        item.label,
        item.priority.label()
    )
}

pub fn format_chore_line(chore: &Chore) -> String {
    let mut line = format!(
        "{:<13}  {}  {}  @{}",
        short_id(chore),
        checkbox(chore.done),
        chore.label,
        chore.assigned_to
    );
    if let Some(due) = chore.due_date {
        let _ = write!(line, "  due {}", due.format("%Y-%m-%d"));
    }
    line
}

#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub client_id: String,
    pub remote_url: Option<String>,
    pub sync_state: SyncState,
    pub last_remote_updated_at: i64,
    pub calendar: usize,
    pub shopping: usize,
    pub bucket: usize,
    pub chores: usize,
    pub unreadable: usize,
}

pub fn status_report(session: &Session<HttpRemote>, settings: &SyncSettings) -> StatusReport {
    let document = session.document();
    StatusReport {
        client_id: session.client_id().to_string(),
        remote_url: settings.remote_url.clone(),
        sync_state: session.sync_state(),
        last_remote_updated_at: session.sync().last_remote_updated_at(),
        calendar: document.calendar.len(),
        shopping: document.shopping.len(),
        bucket: document.bucket.len(),
        chores: document.chores.len(),
        unreadable: document.calendar.opaque_count()
            + document.shopping.opaque_count()
            + document.bucket.opaque_count()
            + document.chores.opaque_count(),
    }
}
