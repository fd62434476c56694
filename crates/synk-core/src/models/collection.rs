//! Ordered entry collections that tolerate malformed elements

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::EntryId;

/// Common behaviour of every collection entry.
pub trait Entry {
    fn id(&self) -> &EntryId;
}

/// Entries carrying a done flag (everything except calendar appointments).
pub trait Completable: Entry {
    fn is_done(&self) -> bool;
    fn set_done(&mut self, done: bool);
}

/// One stored element of a collection.
///
/// Elements that do not parse as the typed entry are kept verbatim so that a
/// document written by an older or newer client survives a round trip here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Slot<T> {
    Entry(T),
    Opaque(Value),
}

impl<T> Slot<T> {
    fn opaque_id(value: &Value) -> Option<&str> {
        value.get("id").and_then(Value::as_str)
    }
}

impl<T: Entry> Slot<T> {
    fn has_id(&self, id: &str) -> bool {
        match self {
            Self::Entry(entry) => entry.id().as_str() == id,
            Self::Opaque(value) => Self::opaque_id(value) == Some(id),
        }
    }
}

/// An ordered sequence of entries. Storage order is insertion order; any
/// other ordering is a presentation concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Collection<T> {
    slots: Vec<Slot<T>>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<T> Collection<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Number of stored elements, typed or not.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Typed entries in storage order.
    pub fn entries(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().filter_map(|slot| match slot {
            Slot::Entry(entry) => Some(entry),
            Slot::Opaque(_) => None,
        })
    }

    /// Elements that could not be read as typed entries.
    pub fn opaque_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| matches!(slot, Slot::Opaque(_)))
            .count()
    }

    pub fn slots(&self) -> &[Slot<T>] {
        &self.slots
    }

    pub fn push(&mut self, entry: T) {
        self.slots.push(Slot::Entry(entry));
    }
}

impl<T: Entry> Collection<T> {
    pub fn get(&self, id: &str) -> Option<&T> {
        self.entries().find(|entry| entry.id().as_str() == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut T> {
        self.slots.iter_mut().find_map(|slot| match slot {
            Slot::Entry(entry) if entry.id().as_str() == id => Some(entry),
            _ => None,
        })
    }

    /// Remove every element carrying `id`, typed or opaque. Returns whether
    /// anything was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.slots.len();
        self.slots.retain(|slot| !slot.has_id(id));
        self.slots.len() != before
    }

    /// Resolve a full id or a unique prefix of one.
    pub fn resolve_id(&self, query: &str) -> std::result::Result<EntryId, Vec<EntryId>> {
        if let Some(entry) = self.get(query) {
            return Ok(entry.id().clone());
        }
        let matches = self
            .entries()
            .filter(|entry| entry.id().as_str().starts_with(query))
            .map(|entry| entry.id().clone())
            .collect::<Vec<_>>();
        if matches.len() == 1 {
            Ok(matches[0].clone())
        } else {
            Err(matches)
        }
    }
}

impl<T: Completable> Collection<T> {
    /// Flip the done flag of the entry with `id`, returning the new value.
    pub fn toggle_done(&mut self, id: &str) -> Option<bool> {
        let entry = self.get_mut(id)?;
        let done = !entry.is_done();
        entry.set_done(done);
        Some(done)
    }
}
