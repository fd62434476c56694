//! Application state for one running front end.
//!
//! A [`Session`] owns the in-memory document, the local store and the sync
//! engine. Every change to the document goes through it so that persisting,
//! scheduling a push, and refreshing observers happen in one place.

use std::future;

use tokio::sync::{mpsc, watch};
use tokio::time::Instant;

use crate::config::SyncSettings;
use crate::error::Result;
use crate::export::{parse_import, render_json_export};
use crate::models::{ClientId, Document};
use crate::remote::{RemoteChange, RemoteChanges, RemoteStore};
use crate::state::SyncState;
use crate::store::LocalStore;
use crate::sync::{BootstrapOutcome, PushOutcome, RemoteDecision, RemoteOutcome, SyncEngine};

/// A queued change to the document, applied by [`Session::run`].
pub type Mutation = Box<dyn FnOnce(&mut Document) -> Result<()> + Send>;

pub struct Session<R> {
    document: Document,
    store: LocalStore,
    sync: SyncEngine<R>,
    changes: Option<RemoteChanges>,
    refresh: watch::Sender<u64>,
}

impl<R: RemoteStore> Session<R> {
    /// Load the persisted document and client id.
    ///
    /// Sync is inert until [`Self::bootstrap`] has run.
    pub fn open(store: LocalStore, remote: Option<R>, settings: &SyncSettings) -> Result<Self> {
        let client_id = store.client_id()?;
        let document = store.load();
        let sync = SyncEngine::new(client_id, remote).with_debounce(settings.debounce);
        let (refresh, _) = watch::channel(0);

        Ok(Self {
            document,
            store,
            sync,
            changes: None,
            refresh,
        })
    }

    /// Replace the clock used to stamp outgoing records.
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.sync = self.sync.with_clock(clock);
        self
    }

    pub const fn document(&self) -> &Document {
        &self.document
    }

    pub const fn client_id(&self) -> &ClientId {
        self.sync.client_id()
    }

    pub const fn store(&self) -> &LocalStore {
        &self.store
    }

    pub const fn sync(&self) -> &SyncEngine<R> {
        &self.sync
    }

    pub const fn sync_state(&self) -> SyncState {
        self.sync.state()
    }

    /// Revision counter bumped every time the document is replaced or changed.
    pub fn subscribe_refresh(&self) -> watch::Receiver<u64> {
        self.refresh.subscribe()
    }

    fn notify_refresh(&self) {
        self.refresh.send_modify(|revision| *revision += 1);
    }

    /// Apply a local change, persist it and schedule a push.
    ///
    /// The change runs on a copy. If it fails, or the copy cannot be
    /// persisted, the document is left exactly as it was.
    pub fn mutate<T>(&mut self, change: impl FnOnce(&mut Document) -> Result<T>) -> Result<T> {
        let mut next = self.document.clone();
        let value = change(&mut next)?;
        self.replace_local(next)?;
        Ok(value)
    }

    fn replace_local(&mut self, document: Document) -> Result<()> {
        self.store.save(&document)?;
        self.document = document;
        self.notify_refresh();
        self.sync.schedule_remote_save();
        Ok(())
    }

    /// Persist the current document and schedule a push.
    pub fn save(&mut self) -> Result<()> {
        self.store.save(&self.document)?;
        self.sync.schedule_remote_save();
        Ok(())
    }

    /// Reconcile with the remote, then start listening for changes.
    ///
    /// Remote trouble never fails the session; it only turns sync off.
    pub async fn bootstrap(&mut self) -> BootstrapOutcome {
        let (outcome, pulled) = self.sync.bootstrap(&self.document).await;
        if let Some(document) = pulled {
            self.replace_from_remote(document);
        }

        self.sync.mark_ready();
        self.changes = self.sync.subscribe();
        if outcome.sync_enabled() && self.changes.is_none() {
            return BootstrapOutcome::Disabled;
        }
        outcome
    }

    /// Handle one change notification from the remote.
    pub fn on_remote_change(&mut self, change: RemoteChange) -> RemoteOutcome {
        match self.sync.decide(change) {
            RemoteDecision::Ignore(outcome) => outcome,
            RemoteDecision::Apply(document) => {
                self.replace_from_remote(document);
                RemoteOutcome::Applied
            }
        }
    }

    /// Adopt a remote document without echoing it back.
    fn replace_from_remote(&mut self, document: Document) {
        self.sync.set_suppress_remote_write(true);
        self.document = document;
        // Goes through the normal save path; suppression keeps it from
        // scheduling a push.
        if let Err(error) = self.save() {
            tracing::warn!("Failed to persist remote document: {error}");
        }
        self.sync.set_suppress_remote_write(false);
        self.notify_refresh();
    }

    /// Push the current document now, cancelling any pending deadline.
    pub async fn push_remote(&mut self) -> PushOutcome {
        self.sync.push_remote(&self.document).await
    }

    /// Replace the whole document from an export file.
    pub fn import_json(&mut self, text: &str) -> Result<()> {
        let document = parse_import(text)?;
        self.replace_local(document)?;
        tracing::info!(entries = self.document.len(), "Imported document");
        Ok(())
    }

    pub fn export_json(&self) -> Result<String> {
        render_json_export(&self.document)
    }

    /// Wait out the pending debounce, if any, and push.
    pub async fn flush(&mut self) -> PushOutcome {
        match self.sync.pending_deadline() {
            Some(deadline) => {
                tokio::time::sleep_until(deadline).await;
                self.push_remote().await
            }
            None => PushOutcome::Skipped,
        }
    }

    /// Next notification from the remote, or `None` once the subscription
    /// has ended. Pends forever when there is no subscription.
    pub async fn next_remote_change(&mut self) -> Option<RemoteChange> {
        next_change(&mut self.changes).await
    }

    /// Serve mutations, remote notifications and the debounce deadline one
    /// at a time until the mutation channel closes, then flush.
    pub async fn run(&mut self, mut mutations: mpsc::Receiver<Mutation>) {
        loop {
            let deadline = self.sync.pending_deadline();
            tokio::select! {
                mutation = mutations.recv() => match mutation {
                    Some(mutation) => {
                        if let Err(error) = self.mutate(mutation) {
                            tracing::warn!("Mutation rejected: {error}");
                        }
                    }
                    None => break,
                },
                change = next_change(&mut self.changes) => match change {
                    Some(change) => {
                        self.on_remote_change(change);
                    }
                    None => {
                        tracing::debug!("Remote subscription ended");
                        self.changes = None;
                    }
                },
                () = sleep_until_due(deadline) => {
                    self.push_remote().await;
                }
            }
        }

        self.flush().await;
    }
}

async fn next_change(changes: &mut Option<RemoteChanges>) -> Option<RemoteChange> {
    match changes {
        Some(changes) => changes.recv().await,
        None => future::pending().await,
    }
}

async fn sleep_until_due(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => future::pending().await,
    }
}
