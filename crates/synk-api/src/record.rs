//! The single shared room record and its change fan-out.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::{watch, Mutex};

use crate::error::AppError;

/// The record exactly as clients write it. `data` is opaque to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRecord {
    pub data: Value,
    pub updated_at: i64,
    pub updated_by: String,
}

#[derive(Clone)]
pub struct RecordStore {
    current: Arc<watch::Sender<Option<StoredRecord>>>,
    data_file: Option<PathBuf>,
    // Serializes snapshot writes so the file always holds the latest record.
    write_lock: Arc<Mutex<()>>,
}

impl RecordStore {
    pub fn in_memory() -> Self {
        Self::with_record(None, None)
    }

    fn with_record(record: Option<StoredRecord>, data_file: Option<PathBuf>) -> Self {
        let (current, _) = watch::channel(record);
        Self {
            current: Arc::new(current),
            data_file,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Load the snapshot file if one is configured and present.
    pub async fn open(data_file: Option<PathBuf>) -> Result<Self, AppError> {
        let Some(path) = data_file else {
            return Ok(Self::in_memory());
        };

        let record = match tokio::fs::read_to_string(&path).await {
            Ok(raw) if raw.trim().is_empty() => None,
            Ok(raw) => Some(serde_json::from_str::<StoredRecord>(&raw).map_err(|error| {
                AppError::internal(format!(
                    "Failed to parse record snapshot {}: {error}",
                    path.display()
                ))
            })?),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => None,
            Err(error) => {
                return Err(AppError::internal(format!(
                    "Failed to read record snapshot {}: {error}",
                    path.display()
                )))
            }
        };

        if let Some(record) = &record {
            tracing::info!(
                updated_at = record.updated_at,
                updated_by = %record.updated_by,
                "Loaded record snapshot from {}",
                path.display()
            );
        }
        Ok(Self::with_record(record, Some(path)))
    }

    pub fn current(&self) -> Option<StoredRecord> {
        self.current.borrow().clone()
    }

    /// Replace the record wholesale and wake every waiting watcher.
    pub async fn replace(&self, record: StoredRecord) -> Result<(), AppError> {
        let _guard = self.write_lock.lock().await;
        if let Some(path) = &self.data_file {
            let serialized = serde_json::to_string(&record)
                .map_err(|error| AppError::internal(error.to_string()))?;
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await.map_err(|error| {
                    AppError::internal(format!(
                        "Failed to create snapshot directory {}: {error}",
                        parent.display()
                    ))
                })?;
            }
            tokio::fs::write(path, serialized).await.map_err(|error| {
                AppError::internal(format!(
                    "Failed to write record snapshot {}: {error}",
                    path.display()
                ))
            })?;
        }
        self.current.send_replace(Some(record));
        Ok(())
    }

    /// The record once its `updatedAt` is past `after`, or `None` when
    /// `wait` elapses first.
    pub async fn wait_newer_than(&self, after: i64, wait: Duration) -> Option<StoredRecord> {
        let mut receiver = self.current.subscribe();
        let newer = receiver.wait_for(|record| {
            record
                .as_ref()
                .is_some_and(|record| record.updated_at > after)
        });
        let newer = match tokio::time::timeout(wait, newer).await {
            Ok(Ok(record)) => record.clone(),
            Ok(Err(_)) | Err(_) => None,
        };
        newer
    }
}
