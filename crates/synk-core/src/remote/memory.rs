//! In-process remote store

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;

use super::{RemoteChange, RemoteChanges, RemoteRecord, RemoteStore};
use crate::error::{Error, Result};

/// A remote record shared between handles in the same process.
///
/// Clones share state, so two sessions holding clones behave like two devices
/// on the same room. Writes are echoed to every subscriber, the writer
/// included.
#[derive(Clone, Default)]
pub struct MemoryRemote {
    inner: Arc<Mutex<MemoryInner>>,
}

#[derive(Default)]
struct MemoryInner {
    record: Option<RemoteRecord>,
    subscribers: Vec<mpsc::UnboundedSender<RemoteChange>>,
    unavailable: bool,
    writes: usize,
}

impl MemoryInner {
    fn notify(&mut self) {
        let change = self.record.clone();
        self.subscribers
            .retain(|subscriber| subscriber.send(change.clone()).is_ok());
    }
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: RemoteRecord) -> Self {
        let remote = Self::new();
        remote.lock().record = Some(record);
        remote
    }

    fn lock(&self) -> MutexGuard<'_, MemoryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make every subsequent call fail, as if the network were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.lock().unavailable = unavailable;
    }

    /// Number of successful writes so far
    pub fn write_count(&self) -> usize {
        self.lock().writes
    }

    pub fn record(&self) -> Option<RemoteRecord> {
        self.lock().record.clone()
    }

    /// Replace the record from outside any session and notify subscribers.
    /// Does not count as a write.
    pub fn publish(&self, record: Option<RemoteRecord>) {
        let mut inner = self.lock();
        inner.record = record;
        inner.notify();
    }

    fn ensure_available(inner: &MemoryInner) -> Result<()> {
        if inner.unavailable {
            Err(Error::Remote("memory remote is unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

impl RemoteStore for MemoryRemote {
    async fn fetch(&self) -> Result<Option<RemoteRecord>> {
        let inner = self.lock();
        Self::ensure_available(&inner)?;
        Ok(inner.record.clone())
    }

    async fn write(&self, record: &RemoteRecord) -> Result<()> {
        let mut inner = self.lock();
        Self::ensure_available(&inner)?;
        inner.record = Some(record.clone());
        inner.writes += 1;
        inner.notify();
        Ok(())
    }

    fn subscribe(&self) -> Result<RemoteChanges> {
        let mut inner = self.lock();
        Self::ensure_available(&inner)?;
        let (sender, receiver) = mpsc::unbounded_channel();
        // Subscribers see the current state first.
        let _ = sender.send(inner.record.clone());
        inner.subscribers.push(sender);
        Ok(receiver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Document;

    fn record(updated_at: i64, by: &str) -> RemoteRecord {
        RemoteRecord::new(&Document::default(), updated_at, &by.into()).unwrap()
    }

    #[tokio::test]
    async fn test_subscribe_delivers_snapshot_then_writes() {
        let remote = MemoryRemote::with_record(record(1, "a"));
        let mut changes = remote.subscribe().unwrap();

        remote.write(&record(2, "b")).await.unwrap();

        assert_eq!(changes.recv().await.unwrap().unwrap().updated_at, 1);
        assert_eq!(changes.recv().await.unwrap().unwrap().updated_at, 2);
        assert_eq!(remote.write_count(), 1);
    }

    #[tokio::test]
    async fn test_unavailable_remote_fails_every_call() {
        let remote = MemoryRemote::new();
        remote.set_unavailable(true);
        assert!(remote.fetch().await.is_err());
        assert!(remote.write(&record(1, "a")).await.is_err());
        assert!(remote.subscribe().is_err());
        assert_eq!(remote.write_count(), 0);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let remote = MemoryRemote::new();
        let other = remote.clone();
        remote.write(&record(5, "a")).await.unwrap();
        assert_eq!(other.fetch().await.unwrap().unwrap().updated_at, 5);
    }

    #[tokio::test]
    async fn test_publish_notifies_without_counting_a_write() {
        let remote = MemoryRemote::with_record(record(3, "a"));
        let mut changes = remote.subscribe().unwrap();
        remote.publish(None);

        assert_eq!(changes.recv().await.unwrap().unwrap().updated_at, 3);
        assert_eq!(changes.recv().await.unwrap(), None);
        assert_eq!(remote.write_count(), 0);
        assert_eq!(remote.record(), None);
    }
}
