//! Durable on-device persistence of the document and the client id.

use std::path::Path;

use crate::db::{Database, KeyValueRepository, SqliteKeyValueRepository};
use crate::error::Result;
use crate::models::{ClientId, Document};

/// Key holding the JSON-serialized document
pub const DOCUMENT_KEY: &str = "cute-synk-app-data";
/// Key holding this installation's client id
pub const CLIENT_ID_KEY: &str = "cute-synk-client-id";

/// Local store backed by the key/value table
pub struct LocalStore {
    db: Database,
}

impl LocalStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_database(Database::open(path)?))
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::from_database(Database::open_in_memory()?))
    }

    pub const fn from_database(db: Database) -> Self {
        Self { db }
    }

    fn repo(&self) -> SqliteKeyValueRepository<'_> {
        SqliteKeyValueRepository::new(self.db.connection())
    }

    /// Load the persisted document.
    ///
    /// Never fails: a missing, unreadable, unparsable or structurally invalid
    /// blob yields a fresh empty document.
    pub fn load(&self) -> Document {
        let raw = match self.repo().get(DOCUMENT_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Document::default(),
            Err(error) => {
                tracing::warn!("Failed to read stored document, starting empty: {error}");
                return Document::default();
            }
        };

        match Document::from_json(&raw) {
            Ok(document) => document,
            Err(error) => {
                tracing::warn!("Stored document rejected, starting empty: {error}");
                Document::default()
            }
        }
    }

    /// Raw stored blob, if any
    pub fn load_raw(&self) -> Result<Option<String>> {
        self.repo().get(DOCUMENT_KEY)
    }

    pub fn save(&self, document: &Document) -> Result<()> {
        self.repo().set(DOCUMENT_KEY, &document.to_json()?)
    }

    /// The persisted client id, generated and stored on first use.
    pub fn client_id(&self) -> Result<ClientId> {
        let repo = self.repo();
        if let Some(existing) = repo.get(CLIENT_ID_KEY)? {
            let existing = existing.trim();
            if !existing.is_empty() {
                return Ok(ClientId::from(existing));
            }
        }

        let client_id = ClientId::generate();
        repo.set(CLIENT_ID_KEY, client_id.as_str())?;
        tracing::info!("Generated new client id {client_id}");
        Ok(client_id)
    }
}
