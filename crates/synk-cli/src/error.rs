use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] synk_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("No {0} provided")]
    EmptyText(&'static str),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error(
        "Sync is not configured. Run `synk config set-remote <URL>` or set SYNK_REMOTE_URL."
    )]
    SyncNotConfigured,
    #[error("Remote is unreachable; working on the local copy only")]
    SyncUnavailable,
}
