//! The materialized post handed over by the content store.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRecord {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub category_name: String,
    #[serde(default)]
    pub subcategory_name: String,
    #[serde(with = "timestamp")]
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub html_content: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub replies: Vec<Reply>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub original_filename: String,
    /// Storage path on the server. Only the filename is printed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl Attachment {
    pub fn named(filename: impl Into<String>) -> Self {
        Self {
            original_filename: filename.into(),
            path: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    #[serde(default)]
    pub content_html: String,
    #[serde(with = "timestamp")]
    pub created_at: NaiveDateTime,
    /// Stored as a boolean or as `0`/`1`.
    #[serde(default, deserialize_with = "flag")]
    pub edited: bool,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl ContentRecord {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Replies oldest first. Replies with equal timestamps keep their order.
    pub fn replies_chronological(&self) -> Vec<&Reply> {
        let mut replies: Vec<&Reply> = self.replies.iter().collect();
        replies.sort_by_key(|r| r.created_at);
        replies
    }

    /// `category > subcategory`, leaving out whichever part is empty.
    pub fn breadcrumb(&self) -> String {
        [self.category_name.trim(), self.subcategory_name.trim()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" > ")
    }
}

fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
        Text(String),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Int(n) => n != 0,
        Flag::Text(s) => matches!(s.trim(), "1" | "true" | "yes"),
    })
}

/// Timestamps as the database writes them (`YYYY-MM-DD HH:MM:SS`), with ISO
/// 8601 variants accepted on input.
pub mod timestamp {
    use super::*;
    use serde::{de, Serializer};

    const STORAGE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
    const ACCEPTED: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];

    pub fn parse(value: &str) -> Option<NaiveDateTime> {
        let value = value.trim();
        ACCEPTED
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
            .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.naive_local()))
            .or_else(|| {
                NaiveDate::parse_from_str(value, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })
    }

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.format(STORAGE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("unrecognized timestamp '{}'", raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORD: &str = r#"{
        "id": 42,
        "title": "VPN setup",
        "category_name": "IT",
        "subcategory_name": "Networking",
        "created_at": "2024-03-05 14:07:00",
        "html_content": "<p>Hello</p>",
        "attachments": [{"original_filename": "guide.pdf", "path": "uploads/files/abc.pdf"}],
        "replies": [
            {"content_html": "<p>second</p>", "created_at": "2024-03-07T09:00:00", "edited": 1},
            {"content_html": "<p>first</p>", "created_at": "2024-03-06 09:00:00", "edited": false}
        ]
    }"#;

    #[test]
    fn test_record_accepts_both_timestamp_styles_and_int_flags() {
        let record = ContentRecord::from_json(RECORD).unwrap();
        assert_eq!(record.id, 42);
        assert_eq!(record.created_at.to_string(), "2024-03-05 14:07:00");
        assert!(record.replies[0].edited);
        assert!(!record.replies[1].edited);
        assert_eq!(record.attachments[0].original_filename, "guide.pdf");
    }

    #[test]
    fn test_replies_sort_oldest_first() {
        let record = ContentRecord::from_json(RECORD).unwrap();
        let bodies: Vec<_> = record
            .replies_chronological()
            .into_iter()
            .map(|r| r.content_html.as_str())
            .collect();
        assert_eq!(bodies, vec!["<p>first</p>", "<p>second</p>"]);
    }

    #[test]
    fn test_breadcrumb_skips_empty_parts() {
        let mut record = ContentRecord::from_json(RECORD).unwrap();
        assert_eq!(record.breadcrumb(), "IT > Networking");
        record.subcategory_name.clear();
        assert_eq!(record.breadcrumb(), "IT");
    }

    #[test]
    fn test_timestamp_variants() {
        assert!(timestamp::parse("2024-03-05T14:07:00.123").is_some());
        assert!(timestamp::parse("2024-03-05T14:07:00+02:00").is_some());
        assert!(timestamp::parse("2024-03-05").is_some());
        assert!(timestamp::parse("March 5").is_none());
    }

    #[test]
    fn test_serialized_record_reads_back() {
        let record = ContentRecord::from_json(RECORD).unwrap();
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(ContentRecord::from_json(&json).unwrap(), record);
    }
}
