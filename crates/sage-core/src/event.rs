//! The immutable event record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Semantic kind of an entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Contextual note
    #[default]
    Record,
    /// Design or implementation decision
    Decision,
    /// Git commit recorded by the post-commit hook
    Commit,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Record => "record",
            Self::Decision => "decision",
            Self::Commit => "commit",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "record" | "r" => Ok(Self::Record),
            "decision" | "d" => Ok(Self::Decision),
            "commit" => Ok(Self::Commit),
            other => Err(format!("unknown entry kind: {other}")),
        }
    }
}

/// A single immutable log entry.
///
/// `seq` is assigned by the store at append time and is the user-facing
/// numeric id. It is never serialized into the event document; the store
/// fills it in when reading rows back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    #[serde(skip)]
    pub seq: i64,

    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub project: String,

    #[serde(default)]
    pub kind: EntryKind,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trip() {
        assert_eq!("decision".parse::<EntryKind>().unwrap(), EntryKind::Decision);
        assert_eq!("d".parse::<EntryKind>().unwrap(), EntryKind::Decision);
        assert_eq!(EntryKind::Commit.to_string(), "commit");
        assert!("note".parse::<EntryKind>().is_err());
    }

    #[test]
    fn test_seq_not_serialized() {
        let e = Event {
            seq: 42,
            id: "x".into(),
            timestamp: Utc::now(),
            project: "global".into(),
            kind: EntryKind::Record,
            title: "t".into(),
            content: "c".into(),
            tags: Vec::new(),
            metadata: BTreeMap::new(),
        };
        let json = serde_json::to_string(&e).unwrap();
        assert!(!json.contains("seq"));
        assert!(!json.contains("tags"));
    }

    #[test]
    fn test_kind_serialization() {
        let json = serde_json::to_string(&EntryKind::Decision).unwrap();
        assert_eq!(json, "\"decision\"");
    }
}
