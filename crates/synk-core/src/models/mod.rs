//! Data models for Synk

mod bucket;
mod calendar;
mod chore;
mod collection;
mod document;
pub mod fields;
mod ids;
mod person;
mod shopping;

pub use bucket::{BucketItem, BucketPatch};
pub use calendar::{CalendarEntry, CalendarPatch};
pub use chore::{Chore, ChorePatch};
pub use collection::{Collection, Completable, Entry, Slot};
pub use document::{validate, CollectionKind, Document, REQUIRED_KEYS};
pub use ids::{ClientId, EntryId};
pub use person::{Person, Priority};
pub use shopping::{ShoppingItem, ShoppingPatch};
