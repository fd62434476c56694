//! Bucket list model

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::collection::{Completable, Entry};
use super::{EntryId, Priority};
use crate::error::{Error, Result};

/// Something we want to do together some day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketItem {
    pub id: EntryId,
    pub label: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub done: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BucketPatch {
    pub label: Option<String>,
    pub priority: Option<Priority>,
}

impl BucketItem {
    pub fn new(label: &str, priority: Priority) -> Result<Self> {
        let label = label.trim();
        if label.is_empty() {
            return Err(Error::InvalidInput(
                "bucket list label must not be empty".to_string(),
            ));
        }
        Ok(Self {
            id: EntryId::new(),
            label: label.to_string(),
            priority,
            done: false,
            extra: Map::new(),
        })
    }

    pub fn apply(&mut self, patch: BucketPatch) {
        if let Some(label) = patch.label {
            let label = label.trim();
            if !label.is_empty() {
                self.label = label.to_string();
            }
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
    }
}

impl Entry for BucketItem {
    fn id(&self) -> &EntryId {
        &self.id
    }
}

impl Completable for BucketItem {
    fn is_done(&self) -> bool {
        self.done
    }

    fn set_done(&mut self, done: bool) {
        self.done = done;
    }
}
