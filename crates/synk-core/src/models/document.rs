//! The household document and its boundary validation

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use super::{BucketItem, CalendarEntry, Chore, Collection, EntryId, ShoppingItem};
use crate::error::{Error, Result};

/// The four collections every document must carry, in stored order.
pub const REQUIRED_KEYS: [&str; 4] = ["calendar", "shopping", "bucket", "chores"];

/// The whole household state. Replaced wholesale on import and on an
/// accepted remote pull, never merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub calendar: Collection<CalendarEntry>,
    pub shopping: Collection<ShoppingItem>,
    pub bucket: Collection<BucketItem>,
    pub chores: Collection<Chore>,
    /// Unknown top-level keys, preserved on write
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Names one of the four collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    Calendar,
    Shopping,
    Bucket,
    Chores,
}

impl CollectionKind {
    pub const ALL: [Self; 4] = [Self::Calendar, Self::Shopping, Self::Bucket, Self::Chores];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Calendar => "calendar",
            Self::Shopping => "shopping",
            Self::Bucket => "bucket",
            Self::Chores => "chores",
        }
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollectionKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| format!("unknown collection '{s}'"))
    }
}

/// Check the top-level shape of an untrusted document.
///
/// True iff `candidate` is an object carrying all four collections, each an
/// array. Individual entries are not inspected.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use synk_core::validate;
///
/// assert!(validate(&json!({ "calendar": [], "shopping": [], "bucket": [], "chores": [] })));
/// assert!(!validate(&json!({ "calendar": [], "shopping": [], "bucket": [] })));
/// assert!(!validate(&json!(null)));
/// ```
#[must_use]
pub fn validate(candidate: &Value) -> bool {
    shape_error(candidate).is_none()
}

fn shape_error(candidate: &Value) -> Option<String> {
    let Some(object) = candidate.as_object() else {
        return Some("document must be a JSON object".to_string());
    };
    REQUIRED_KEYS.iter().find_map(|key| match object.get(*key) {
        Some(Value::Array(_)) => None,
        Some(_) => Some(format!("'{key}' must be an array")),
        None => Some(format!("missing '{key}'")),
    })
}

impl Document {
    /// Validate then convert an untrusted value.
    pub fn from_value(value: Value) -> Result<Self> {
        if let Some(reason) = shape_error(&value) {
            return Err(Error::InvalidDocument(reason));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Parse JSON text and validate it as a document.
    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Total number of stored elements across all collections.
    pub fn len(&self) -> usize {
        self.calendar.len() + self.shopping.len() + self.bucket.len() + self.chores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn count(&self, kind: CollectionKind) -> usize {
        match kind {
            CollectionKind::Calendar => self.calendar.len(),
            CollectionKind::Shopping => self.shopping.len(),
            CollectionKind::Bucket => self.bucket.len(),
            CollectionKind::Chores => self.chores.len(),
        }
    }

    /// Delete an element by id from one collection.
    pub fn remove(&mut self, kind: CollectionKind, id: &str) -> bool {
        match kind {
            CollectionKind::Calendar => self.calendar.remove(id),
            CollectionKind::Shopping => self.shopping.remove(id),
            CollectionKind::Bucket => self.bucket.remove(id),
            CollectionKind::Chores => self.chores.remove(id),
        }
    }

    /// Resolve a full id or unique id prefix within one collection.
    pub fn resolve_id(&self, kind: CollectionKind, query: &str) -> Result<EntryId> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::InvalidInput("entry id must not be empty".to_string()));
        }
        let resolved = match kind {
            CollectionKind::Calendar => self.calendar.resolve_id(query),
            CollectionKind::Shopping => self.shopping.resolve_id(query),
            CollectionKind::Bucket => self.bucket.resolve_id(query),
            CollectionKind::Chores => self.chores.resolve_id(query),
        };
        resolved.map_err(|matches| {
            if matches.is_empty() {
                Error::NotFound(format!("{kind}/{query}"))
            } else {
                let options = matches
                    .iter()
                    .take(3)
                    .map(|id| id.as_str().chars().take(13).collect::<String>())
                    .collect::<Vec<_>>()
                    .join(", ");
                Error::InvalidInput(format!(
                    "id prefix '{query}' is ambiguous; matches: {options}"
                ))
            }
        })
    }

    /// Flip the done flag on a list entry. Calendar entries have none.
    pub fn toggle_done(&mut self, kind: CollectionKind, id: &str) -> Result<bool> {
        let toggled = match kind {
            CollectionKind::Calendar => {
                return Err(Error::InvalidInput(
                    "calendar entries cannot be marked done".to_string(),
                ))
            }
            CollectionKind::Shopping => self.shopping.toggle_done(id),
            CollectionKind::Bucket => self.bucket.toggle_done(id),
            CollectionKind::Chores => self.chores.toggle_done(id),
        };
        toggled.ok_or_else(|| Error::NotFound(format!("{kind}/{id}")))
    }
}
