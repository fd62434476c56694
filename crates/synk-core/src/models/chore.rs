//! Household chore model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::collection::{Completable, Entry};
use super::fields::optional_date;
use super::{EntryId, Person};
use crate::error::{Error, Result};

/// A recurring or one-off household task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chore {
    pub id: EntryId,
    pub label: String,
    #[serde(default, rename = "assignedTo")]
    pub assigned_to: Person,
    #[serde(default, rename = "dueDate", with = "optional_date")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub done: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChorePatch {
    pub label: Option<String>,
    pub assigned_to: Option<Person>,
    pub due_date: Option<Option<NaiveDate>>,
}

impl Chore {
    pub fn new(label: &str, assigned_to: Person, due_date: Option<NaiveDate>) -> Result<Self> {
        let label = label.trim();
        if label.is_empty() {
            return Err(Error::InvalidInput(
                "chore label must not be empty".to_string(),
            ));
        }
        Ok(Self {
            id: EntryId::new(),
            label: label.to_string(),
            assigned_to,
            due_date,
            done: false,
            extra: Map::new(),
        })
    }

    pub fn apply(&mut self, patch: ChorePatch) {
        if let Some(label) = patch.label {
            let label = label.trim();
            if !label.is_empty() {
                self.label = label.to_string();
            }
        }
        if let Some(assigned_to) = patch.assigned_to {
            self.assigned_to = assigned_to;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
    }
}

impl Entry for Chore {
    fn id(&self) -> &EntryId {
        &self.id
    }
}

impl Completable for Chore {
    fn is_done(&self) -> bool {
        self.done
    }

    fn set_done(&mut self, done: bool) {
        self.done = done;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_uses_camel_case_field_names() {
        let mut chore = Chore::new("Støvsug", Person::Arvid, None).unwrap();
        chore.id = EntryId::from("c1");
        let value = serde_json::to_value(&chore).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "c1",
                "label": "Støvsug",
                "assignedTo": "arvid",
                "dueDate": "",
                "done": false
            })
        );
    }

    #[test]
    fn test_reads_due_date() {
        let chore: Chore = serde_json::from_value(json!({
            "id": "c2",
            "label": "Vask op",
            "assignedTo": "ida",
            "dueDate": "2024-03-01",
            "done": true
        }))
        .unwrap();
        assert_eq!(chore.due_date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert!(chore.done);
    }
}
