//! Shared cross-platform state types.

use std::fmt;

use serde::Serialize;

/// Sync status reported to front ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncState {
    /// No remote configured, or sync disabled after a bootstrap failure.
    Offline,
    /// Remote configured but the initial reconciliation has not completed.
    Syncing,
    /// Bootstrapped and idle.
    Synced,
    /// Bootstrapped, a debounced push is waiting to fire.
    Pending,
}

impl SyncState {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Offline => "offline",
            Self::Syncing => "syncing",
            Self::Synced => "synced",
            Self::Pending => "pending",
        }
    }
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
