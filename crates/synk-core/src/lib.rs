//! synk-core - Core library for Synk
//!
//! This crate contains the household document model, the on-device store,
//! and the last-writer-wins sync engine shared by the CLI and any other
//! front end that mirrors the document to the shared remote record.

pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod models;
pub mod remote;
pub mod session;
pub mod state;
pub mod store;
pub mod sync;
pub mod util;

pub use config::SyncSettings;
pub use error::{Error, Result};
pub use models::{validate, ClientId, CollectionKind, Document, EntryId};
pub use remote::{HttpRemote, MemoryRemote, RemoteRecord, RemoteStore};
pub use session::{Mutation, Session};
pub use state::SyncState;
pub use store::LocalStore;
pub use sync::{BootstrapOutcome, PushOutcome, RemoteOutcome, SyncEngine};
