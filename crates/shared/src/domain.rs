use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// Store-assigned task identifier. Opaque to the client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl TaskId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Cancelled => "cancelled",
        }
    }
}

/// Start date as sent by the store. The interpreter occasionally emits full
/// timestamps, so the raw text is kept and only the leading date is parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StartDate(pub String);

impl StartDate {
    pub fn as_date(&self) -> Option<NaiveDate> {
        let head = self.0.get(..10)?;
        NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(alias = "_id")]
    pub id: TaskId,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<StartDate>,
    pub status: TaskStatus,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_timestamp"
    )]
    pub created_at: Option<NaiveDateTime>,
}

// Accepts RFC 3339 (normalised to its naive UTC value) or a naive ISO 8601
// timestamp; anything else reads as absent.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|raw| {
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.naive_utc())
            .or_else(|_| NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f"))
            .ok()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_accepts_store_key_alias() {
        let task: Task = serde_json::from_str(
            r#"{"_id":"60c7b41b","description":"realizar app","start_date":"2025-07-03","status":"in_progress"}"#,
        )
        .expect("decode");
        assert_eq!(task.id, TaskId("60c7b41b".into()));
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(
            task.start_date.and_then(|d| d.as_date()),
            NaiveDate::from_ymd_opt(2025, 7, 3)
        );
        assert!(task.created_at.is_none());
    }

    #[test]
    fn created_at_parses_naive_and_offset_forms() {
        let naive: Task = serde_json::from_str(
            r#"{"id":"a","description":"x","status":"pending","created_at":"2025-07-03T10:15:00.123456"}"#,
        )
        .expect("decode naive");
        assert!(naive.created_at.is_some());

        let offset: Task = serde_json::from_str(
            r#"{"id":"b","description":"x","status":"pending","created_at":"2025-07-03T10:15:00+02:00"}"#,
        )
        .expect("decode offset");
        assert_eq!(
            offset.created_at.map(|ts| ts.to_string()),
            Some("2025-07-03 08:15:00".to_string())
        );

        let garbage: Task = serde_json::from_str(
            r#"{"id":"c","description":"x","status":"pending","created_at":"yesterday"}"#,
        )
        .expect("decode garbage");
        assert!(garbage.created_at.is_none());
    }

    #[test]
    fn start_date_keeps_timestamp_text_but_exposes_date() {
        let date = StartDate("2025-07-03T00:00:00Z".into());
        assert_eq!(date.as_date(), NaiveDate::from_ymd_opt(2025, 7, 3));
        assert_eq!(StartDate("mañana".into()).as_date(), None);
    }

    #[test]
    fn status_outside_closed_set_is_rejected() {
        let err = serde_json::from_str::<Task>(
            r#"{"id":"a","description":"x","status":"archived"}"#,
        );
        assert!(err.is_err());
    }
}
