//! Last-writer-wins synchronization with the shared remote record.
//!
//! The engine owns the protocol state only. The [`crate::Session`] owns the
//! document and local store and applies whatever the engine decides.

mod engine;

pub use engine::{BootstrapOutcome, PushOutcome, RemoteDecision, RemoteOutcome, SyncEngine};
