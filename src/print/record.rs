//! Event records that carry custom field values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::fields::ValueMap;

/// Kinds of record an event manages. Only participants and staff get badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Participant,
    Staff,
    Course,
    Hall,
}

impl RecordKind {
    pub fn is_printable(self) -> bool {
        matches!(self, RecordKind::Participant | RecordKind::Staff)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RecordKind::Participant => "participant",
            RecordKind::Staff => "staff",
            RecordKind::Course => "course",
            RecordKind::Hall => "hall",
        }
    }

    /// Role printed when a record has no `role` value.
    pub fn display_name(self) -> &'static str {
        match self {
            RecordKind::Participant => "Participant",
            RecordKind::Staff => "Staff",
            RecordKind::Course => "Course",
            RecordKind::Hall => "Hall",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "participant" | "participants" => Ok(RecordKind::Participant),
            "staff" => Ok(RecordKind::Staff),
            "course" | "courses" => Ok(RecordKind::Course),
            "hall" | "halls" => Ok(RecordKind::Hall),
            other => Err(format!("unknown record kind: {}", other)),
        }
    }
}

/// A record as fetched for printing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeRecord {
    pub id: String,
    pub kind: RecordKind,
    #[serde(default, rename = "valueMap", alias = "values")]
    pub values: ValueMap,
    /// Set on first print and reused verbatim afterwards.
    #[serde(default)]
    pub badge_id: Option<String>,
    #[serde(default)]
    pub badge_printed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub badge_printed_by: Option<String>,
}

impl BadgeRecord {
    pub fn new(kind: RecordKind, id: impl Into<String>, values: ValueMap) -> Self {
        Self {
            id: id.into(),
            kind,
            values,
            badge_id: None,
            badge_printed_at: None,
            badge_printed_by: None,
        }
    }

    /// `firstName lastName`, else `name`, else empty.
    pub fn display_name(&self) -> String {
        let full = ["firstName", "lastName"]
            .iter()
            .map(|k| self.values.text(k).trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if full.is_empty() {
            self.values.text("name").trim().to_string()
        } else {
            full
        }
    }

    pub fn role(&self) -> String {
        let role = self.values.text("role");
        if role.trim().is_empty() {
            self.kind.display_name().to_string()
        } else {
            role
        }
    }

    /// Stored badge id, if it is non-blank.
    pub fn existing_badge_id(&self) -> Option<&str> {
        self.badge_id.as_deref().filter(|id| !id.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parse() {
        assert_eq!("Staff".parse::<RecordKind>(), Ok(RecordKind::Staff));
        assert_eq!("participants".parse::<RecordKind>(), Ok(RecordKind::Participant));
        assert!("speaker".parse::<RecordKind>().is_err());
        assert!(!RecordKind::Hall.is_printable());
    }

    #[test]
    fn test_display_name() {
        let values = ValueMap::new().with("firstName", "Ada").with("lastName", "Lovelace");
        let record = BadgeRecord::new(RecordKind::Participant, "p1", values);
        assert_eq!(record.display_name(), "Ada Lovelace");

        let record = BadgeRecord::new(
            RecordKind::Staff,
            "s1",
            ValueMap::new().with("name", "Front Desk"),
        );
        assert_eq!(record.display_name(), "Front Desk");
        assert_eq!(record.role(), "Staff");
    }

    #[test]
    fn test_blank_badge_id_ignored() {
        let mut record = BadgeRecord::new(RecordKind::Staff, "s1", ValueMap::new());
        record.badge_id = Some("  ".into());
        assert_eq!(record.existing_badge_id(), None);
        record.badge_id = Some("STAFF-s1-1700".into());
        assert_eq!(record.existing_badge_id(), Some("STAFF-s1-1700"));
    }

    #[test]
    fn test_wire_format() {
        let json = r#"{"id": "p1", "kind": "participant", "valueMap": {"firstName": "Ada"},
                       "badgeId": "121700000000", "badgePrintedAt": "2024-03-01T10:00:00Z"}"#;
        let record: BadgeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.badge_id.as_deref(), Some("121700000000"));
        assert!(record.badge_printed_at.is_some());
        assert_eq!(record.badge_printed_by, None);

        let out = serde_json::to_value(&record).unwrap();
        assert_eq!(out["valueMap"]["firstName"], "Ada");
        assert!(out.get("values").is_none());
    }
}
