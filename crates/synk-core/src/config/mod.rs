//! Sync configuration shared by every front end.

use std::fmt;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::util::non_blank;

/// The single shared room both devices read and write.
pub const ROOM_ID: &str = "arvid-ida";

/// Quiet period after the last local mutation before the document is pushed.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(600);
/// How long one long-poll request waits for a change before returning empty.
pub const DEFAULT_WATCH_TIMEOUT: Duration = Duration::from_secs(25);
/// Pause before re-polling after a failed watch request.
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_secs(2);

/// Settings for mirroring the document to the remote record
#[derive(Clone, PartialEq, Eq)]
pub struct SyncSettings {
    /// Base URL of the remote record host (e.g. `http://127.0.0.1:8080`)
    pub remote_url: Option<String>,
    /// Optional bearer token expected by the host
    pub auth_token: Option<String>,
    pub debounce: Duration,
    pub watch_timeout: Duration,
    pub retry_backoff: Duration,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            remote_url: None,
            auth_token: None,
            debounce: DEFAULT_DEBOUNCE,
            watch_timeout: DEFAULT_WATCH_TIMEOUT,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
        }
    }
}

impl fmt::Debug for SyncSettings {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("SyncSettings")
            .field("remote_url", &self.remote_url)
            .field(
                "auth_token",
                &self.auth_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("debounce", &self.debounce)
            .field("watch_timeout", &self.watch_timeout)
            .field("retry_backoff", &self.retry_backoff)
            .finish()
    }
}

impl SyncSettings {
    /// Create settings pointing at a remote host
    pub fn new(remote_url: impl Into<String>) -> Self {
        Self {
            remote_url: Some(remote_url.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_auth_token(mut self, token: Option<String>) -> Self {
        self.auth_token = non_blank(token);
        self
    }

    #[must_use]
    pub const fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Check if a remote is configured
    pub fn is_configured(&self) -> bool {
        non_blank(self.remote_url.clone()).is_some()
    }

    /// The remote base URL without trailing slashes, validated.
    pub fn remote_base_url(&self) -> Result<Option<String>> {
        let Some(url) = non_blank(self.remote_url.clone()) else {
            return Ok(None);
        };
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(Error::InvalidInput(format!(
                "remote URL must include http:// or https:// (got '{url}')"
            )));
        }
        Ok(Some(url.trim_end_matches('/').to_string()))
    }
}
