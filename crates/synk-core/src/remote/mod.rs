//! Remote record stores the sync engine can mirror to.

mod http;
mod memory;
mod record;

use tokio::sync::mpsc;

use crate::error::Result;

pub use http::HttpRemote;
pub use memory::MemoryRemote;
pub use record::RemoteRecord;

/// Header carrying the fixed room identifier on every request
pub const ROOM_HEADER: &str = "x-synk-room";

/// One change notification: the record as it now stands, or `None` when the
/// remote holds no record.
pub type RemoteChange = Option<RemoteRecord>;

/// Long-lived stream of change notifications. Delivers the current state
/// once on subscribe and then every later change, our own writes included.
pub type RemoteChanges = mpsc::UnboundedReceiver<RemoteChange>;

/// Trait for the shared remote record (async)
#[allow(async_fn_in_trait)]
pub trait RemoteStore {
    /// Read the current record, if one exists
    async fn fetch(&self) -> Result<Option<RemoteRecord>>;

    /// Replace the record wholesale
    async fn write(&self, record: &RemoteRecord) -> Result<()>;

    /// Start receiving change notifications for the rest of the process
    fn subscribe(&self) -> Result<RemoteChanges>;
}
