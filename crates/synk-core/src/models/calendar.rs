//! Calendar appointment model

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::collection::Entry;
use super::fields::optional_clock_time;
use super::{EntryId, Person};
use crate::error::{Error, Result};

/// A planned appointment on a given day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEntry {
    pub id: EntryId,
    pub title: String,
    pub date: NaiveDate,
    /// Start time, `None` for all-day plans
    #[serde(default, with = "optional_clock_time")]
    pub time: Option<NaiveTime>,
    #[serde(default)]
    pub person: Person,
    #[serde(default)]
    pub notes: String,
    /// Fields this client does not know about, preserved on write
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Field changes for an existing appointment. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalendarPatch {
    pub title: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<Option<NaiveTime>>,
    pub person: Option<Person>,
    pub notes: Option<String>,
}

impl CalendarEntry {
    /// Create a new appointment. The title must not be blank.
    pub fn new(
        title: &str,
        date: NaiveDate,
        time: Option<NaiveTime>,
        person: Person,
        notes: &str,
    ) -> Result<Self> {
        let title = title.trim();
        if title.is_empty() {
            return Err(Error::InvalidInput(
                "calendar title must not be empty".to_string(),
            ));
        }
        Ok(Self {
            id: EntryId::new(),
            title: title.to_string(),
            date,
            time,
            person,
            notes: notes.trim().to_string(),
            extra: Map::new(),
        })
    }

    /// Apply a patch. A blank title keeps the current one.
    pub fn apply(&mut self, patch: CalendarPatch) {
        if let Some(title) = patch.title {
            let title = title.trim();
            if !title.is_empty() {
                self.title = title.to_string();
            }
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(time) = patch.time {
            self.time = time;
        }
        if let Some(person) = patch.person {
            self.person = person;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes.trim().to_string();
        }
    }
}

impl Entry for CalendarEntry {
    fn id(&self) -> &EntryId {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_trims_and_rejects_blank_title() {
        let entry = CalendarEntry::new(" Tandlæge ", date(2024, 5, 2), None, Person::Ida, " ")
            .unwrap();
        assert_eq!(entry.title, "Tandlæge");
        assert_eq!(entry.notes, "");

        assert!(CalendarEntry::new("  ", date(2024, 5, 2), None, Person::Ida, "").is_err());
    }

    #[test]
    fn test_serializes_stored_shape() {
        let mut entry =
            CalendarEntry::new("Middag", date(2024, 5, 2), None, Person::Begge, "").unwrap();
        entry.id = EntryId::from("e1");
        entry.time = Some(NaiveTime::from_hms_opt(18, 30, 0).unwrap());

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "e1",
                "title": "Middag",
                "date": "2024-05-02",
                "time": "18:30",
                "person": "begge",
                "notes": ""
            })
        );
    }

    #[test]
    fn test_deserializes_empty_time_and_defaults() {
        let entry: CalendarEntry = serde_json::from_value(json!({
            "id": "e2",
            "title": "Fødselsdag",
            "date": "2024-08-11",
            "time": "",
            "color": "pink"
        }))
        .unwrap();
        assert_eq!(entry.time, None);
        assert_eq!(entry.person, Person::Begge);
        assert_eq!(entry.extra.get("color"), Some(&json!("pink")));
    }

    #[test]
    fn test_apply_keeps_title_when_blank() {
        let mut entry =
            CalendarEntry::new("Biograf", date(2024, 1, 1), None, Person::Arvid, "").unwrap();
        entry.apply(CalendarPatch {
            title: Some("   ".to_string()),
            time: Some(Some(NaiveTime::from_hms_opt(20, 0, 0).unwrap())),
            notes: Some(" popcorn ".to_string()),
            ..CalendarPatch::default()
        });
        assert_eq!(entry.title, "Biograf");
        assert_eq!(entry.notes, "popcorn");
        assert!(entry.time.is_some());
    }
}
