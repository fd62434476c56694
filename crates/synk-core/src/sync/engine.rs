//! Protocol state machine: bootstrap, debounced push, incoming filtering.

use std::time::Duration;

use tokio::time::Instant;

use crate::config::DEFAULT_DEBOUNCE;
use crate::models::{ClientId, Document};
use crate::remote::{RemoteChange, RemoteChanges, RemoteRecord, RemoteStore};
use crate::state::SyncState;
use crate::util::now_millis;

/// Result of the startup reconciliation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// No remote configured; nothing to reconcile
    LocalOnly,
    /// The remote record was accepted and replaced the local document
    Pulled { updated_at: i64 },
    /// The remote was empty and the local document was published
    Seeded { updated_at: i64 },
    /// A remote record exists but its payload is not a document; local wins
    Rejected,
    /// The remote failed; sync stays off for the rest of the session
    Disabled,
}

impl BootstrapOutcome {
    /// Whether outgoing pushes and the change subscription are active afterwards
    pub const fn sync_enabled(self) -> bool {
        matches!(
            self,
            Self::Pulled { .. } | Self::Seeded { .. } | Self::Rejected
        )
    }
}

/// What happened to one incoming change notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteOutcome {
    /// The notification carried no record
    Empty,
    /// The payload failed document validation
    Invalid,
    /// Not strictly newer than the newest record already seen
    Stale,
    /// Our own write echoing back
    OwnEcho,
    /// A peer's newer write replaced the local document
    Applied,
}

/// Decision for an incoming notification, before it is applied
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteDecision {
    Ignore(RemoteOutcome),
    Apply(Document),
}

/// Result of a push attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// Not ready, suppressed, or no remote
    Skipped,
    Pushed { updated_at: i64 },
    /// The write failed; local state is untouched and nothing is retried
    Failed,
}

/// State of the timestamp-and-origin sync protocol for one session
pub struct SyncEngine<R> {
    remote: Option<R>,
    client_id: ClientId,
    last_remote_updated_at: i64,
    suppress_remote_write: bool,
    ready: bool,
    debounce: Duration,
    pending_push: Option<Instant>,
    clock: fn() -> i64,
}

impl<R: RemoteStore> SyncEngine<R> {
    pub fn new(client_id: ClientId, remote: Option<R>) -> Self {
        Self {
            remote,
            client_id,
            last_remote_updated_at: 0,
            suppress_remote_write: false,
            ready: false,
            debounce: DEFAULT_DEBOUNCE,
            pending_push: None,
            clock: now_millis,
        }
    }

    #[must_use]
    pub const fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Replace the wall clock used to stamp outgoing records.
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    pub const fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    pub const fn last_remote_updated_at(&self) -> i64 {
        self.last_remote_updated_at
    }

    pub const fn is_ready(&self) -> bool {
        self.ready
    }

    pub const fn is_suppressed(&self) -> bool {
        self.suppress_remote_write
    }

    pub const fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// When the debounced push is due, if one is scheduled
    pub const fn pending_deadline(&self) -> Option<Instant> {
        self.pending_push
    }

    pub const fn state(&self) -> SyncState {
        if self.remote.is_none() {
            SyncState::Offline
        } else if !self.ready {
            SyncState::Syncing
        } else if self.pending_push.is_some() {
            SyncState::Pending
        } else {
            SyncState::Synced
        }
    }

    pub fn set_suppress_remote_write(&mut self, suppress: bool) {
        self.suppress_remote_write = suppress;
    }

    fn disable(&mut self) {
        self.remote = None;
        self.ready = false;
        self.pending_push = None;
    }

    /// Reconcile with the remote once at startup.
    ///
    /// Returns the remote document when it should replace the local one. The
    /// engine is not marked ready here; call [`Self::mark_ready`] once the
    /// caller has applied the outcome.
    pub async fn bootstrap(&mut self, local: &Document) -> (BootstrapOutcome, Option<Document>) {
        let Some(remote) = self.remote.as_ref() else {
            return (BootstrapOutcome::LocalOnly, None);
        };

        let fetched = remote.fetch().await;
        match fetched {
            Err(error) => {
                tracing::warn!("Remote unavailable, continuing local-only: {error}");
                self.disable();
                (BootstrapOutcome::Disabled, None)
            }
            Ok(Some(record)) => match record.document() {
                Ok(document) => {
                    self.last_remote_updated_at = record.updated_at;
                    tracing::info!(
                        updated_at = record.updated_at,
                        updated_by = %record.updated_by,
                        "Pulled remote document"
                    );
                    (
                        BootstrapOutcome::Pulled {
                            updated_at: record.updated_at,
                        },
                        Some(document),
                    )
                }
                Err(error) => {
                    tracing::warn!("Remote record rejected, keeping local document: {error}");
                    (BootstrapOutcome::Rejected, None)
                }
            },
            Ok(None) => {
                let updated_at = (self.clock)();
                let record = match RemoteRecord::new(local, updated_at, &self.client_id) {
                    Ok(record) => record,
                    Err(error) => {
                        tracing::warn!("Failed to encode local document for seeding: {error}");
                        self.disable();
                        return (BootstrapOutcome::Disabled, None);
                    }
                };
                let written = remote.write(&record).await;
                if let Err(error) = written {
                    tracing::warn!("Failed to seed remote record, continuing local-only: {error}");
                    self.disable();
                    return (BootstrapOutcome::Disabled, None);
                }
                self.last_remote_updated_at = updated_at;
                tracing::info!(updated_at, "Seeded remote record from local document");
                (BootstrapOutcome::Seeded { updated_at }, None)
            }
        }
    }

    /// Allow outgoing pushes. Only effective while a remote is attached.
    pub fn mark_ready(&mut self) {
        self.ready = self.remote.is_some();
    }

    /// Open the change subscription. A failure disables sync.
    pub fn subscribe(&mut self) -> Option<RemoteChanges> {
        if !self.ready {
            return None;
        }
        let subscribed = self.remote.as_ref().map(RemoteStore::subscribe)?;
        match subscribed {
            Ok(changes) => Some(changes),
            Err(error) => {
                tracing::warn!("Failed to subscribe to remote changes, continuing local-only: {error}");
                self.disable();
                None
            }
        }
    }

    /// (Re)arm the debounced push after a local mutation.
    ///
    /// Returns whether a push is now scheduled. A new call always replaces
    /// the previous deadline.
    pub fn schedule_remote_save(&mut self) -> bool {
        if !self.ready || self.suppress_remote_write {
            return false;
        }
        self.pending_push = Some(Instant::now() + self.debounce);
        true
    }

    /// Write `document` as the new remote record.
    ///
    /// Clears the pending deadline. Readiness and suppression are checked at
    /// call time, since either may have changed since scheduling.
    ///
    /// The record is stamped with the local clock. A clock running behind an
    /// already applied peer write never moves the last seen timestamp back.
    pub async fn push_remote(&mut self, document: &Document) -> PushOutcome {
        self.pending_push = None;
        if !self.ready || self.suppress_remote_write {
            return PushOutcome::Skipped;
        }
        let Some(remote) = self.remote.as_ref() else {
            return PushOutcome::Skipped;
        };

        let updated_at = (self.clock)();
        let record = match RemoteRecord::new(document, updated_at, &self.client_id) {
            Ok(record) => record,
            Err(error) => {
                tracing::warn!("Failed to encode document for push: {error}");
                return PushOutcome::Failed;
            }
        };

        let written = remote.write(&record).await;
        match written {
            Ok(()) => {
                self.last_remote_updated_at = self.last_remote_updated_at.max(updated_at);
                tracing::debug!(updated_at, "Pushed document to remote");
                PushOutcome::Pushed { updated_at }
            }
            Err(error) => {
                tracing::warn!("Remote push failed, local state kept: {error}");
                PushOutcome::Failed
            }
        }
    }

    /// Filter an incoming notification by validity, timestamp and origin.
    pub fn decide(&mut self, change: RemoteChange) -> RemoteDecision {
        let Some(record) = change else {
            return RemoteDecision::Ignore(RemoteOutcome::Empty);
        };

        let document = match record.document() {
            Ok(document) => document,
            Err(error) => {
                tracing::warn!("Ignoring remote change with invalid payload: {error}");
                return RemoteDecision::Ignore(RemoteOutcome::Invalid);
            }
        };

        if record.updated_at <= self.last_remote_updated_at {
            tracing::debug!(
                updated_at = record.updated_at,
                seen = self.last_remote_updated_at,
                "Ignoring stale remote change"
            );
            return RemoteDecision::Ignore(RemoteOutcome::Stale);
        }

        // Advance before the origin check so a later replay of our own write
        // is filtered as stale too.
        self.last_remote_updated_at = record.updated_at;

        if record.is_from(&self.client_id) {
            tracing::debug!(updated_at = record.updated_at, "Ignoring own echo");
            return RemoteDecision::Ignore(RemoteOutcome::OwnEcho);
        }

        tracing::info!(
            updated_at = record.updated_at,
            updated_by = %record.updated_by,
            "Accepting remote change"
        );
        RemoteDecision::Apply(document)
    }
}
