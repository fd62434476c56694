//! The shared remote record

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::models::{ClientId, Document};

/// The record held by the remote store, read and written wholesale.
///
/// `data` stays untyped until validated: a peer (or anything else with write
/// access) may have stored something that is not a document at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteRecord {
    #[serde(default)]
    pub data: Value,
    /// Unix ms at which the writer produced this record
    #[serde(default)]
    pub updated_at: i64,
    #[serde(default)]
    pub updated_by: String,
}

impl RemoteRecord {
    pub fn new(document: &Document, updated_at: i64, updated_by: &ClientId) -> Result<Self> {
        Ok(Self {
            data: document.to_value()?,
            updated_at,
            updated_by: updated_by.to_string(),
        })
    }

    /// Validate and convert the payload.
    pub fn document(&self) -> Result<Document> {
        Document::from_value(self.data.clone())
    }

    pub fn is_from(&self, client_id: &ClientId) -> bool {
        self.updated_by == client_id.as_str()
    }
}
