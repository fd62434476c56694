//! Person and priority enums shared by several collections

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Who an appointment or chore belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Person {
    Arvid,
    Ida,
    /// Both of us
    #[default]
    Begge,
}

impl Person {
    pub const ALL: [Self; 3] = [Self::Arvid, Self::Ida, Self::Begge];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Arvid => "arvid",
            Self::Ida => "ida",
            Self::Begge => "begge",
        }
    }

    /// Lenient parse used by edit flows: anything unrecognized means both.
    #[must_use]
    pub fn normalize(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Person {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|person| person.as_str() == normalized)
            .ok_or_else(|| format!("unknown person '{s}' (expected arvid, ida or begge)"))
    }
}

/// Bucket list priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Display label shown in list views
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Lav",
            Self::Medium => "Medium",
            Self::High => "Høj",
        }
    }

    /// Lenient parse: anything unrecognized means medium.
    #[must_use]
    pub fn normalize(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|priority| priority.as_str() == normalized)
            .ok_or_else(|| format!("unknown priority '{s}' (expected low, medium or high)"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_normalize_is_case_insensitive() {
        assert_eq!(Person::normalize("IDA"), Person::Ida);
        assert_eq!(Person::normalize(" Arvid "), Person::Arvid);
    }

    #[test]
    fn test_person_normalize_falls_back_to_both() {
        assert_eq!(Person::normalize("someone"), Person::Begge);
        assert_eq!(Person::normalize(""), Person::Begge);
    }

    #[test]
    fn test_priority_normalize_falls_back_to_medium() {
        assert_eq!(Priority::normalize("HIGH"), Priority::High);
        assert_eq!(Priority::normalize("urgent"), Priority::Medium);
    }

    #[test]
    fn test_priority_labels() {
        assert_eq!(Priority::Low.label(), "Lav");
        assert_eq!(Priority::High.label(), "Høj");
    }

    #[test]
    fn test_person_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Person::Begge).unwrap(), "\"begge\"");
    }
}
