use super::enums::TaskStatus;
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};

/// Server-assigned identifier. The client never makes one up.
pub type EntityId = i64;

/// Parse a server timestamp.
///
/// Accepts RFC 3339, naive ISO datetimes (`2024-05-01T09:30:00`, with or
/// without fractional seconds) and plain dates, which are taken as local
/// midnight.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Local).naive_local());
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

/// serde helper for optional, loosely formatted timestamps
pub fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}

/// A task as returned by `GET /api/tasks`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Task {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub due_date: Option<NaiveDateTime>,
    pub status: TaskStatus,
}

impl Task {
    /// Due date formatted for display (`YYYY-MM-DD` or "No date")
    pub fn due_label(&self) -> String {
        match self.due_date {
            Some(due) => due.date().format("%Y-%m-%d").to_string(),
            None => "No date".to_string(),
        }
    }

    /// Pending and due before `today`
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status == TaskStatus::Pending
            && self.due_date.map(|d| d.date() < today).unwrap_or(false)
    }

    /// Case-insensitive match against title or description
    pub fn matches_search(&self, needle_lower: &str) -> bool {
        if needle_lower.is_empty() {
            return true;
        }
        self.title.to_lowercase().contains(needle_lower)
            || self
                .description
                .as_deref()
                .map(|d| d.to_lowercase().contains(needle_lower))
                .unwrap_or(false)
    }
}

/// Body sent on task create and update
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    pub status: TaskStatus,
}

impl TaskDraft {
    /// Full copy of an existing task with its status flipped
    pub fn toggled_from(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            due_date: task.due_date.map(|d| d.date().format("%Y-%m-%d").to_string()),
            status: task.status.toggled(),
        }
    }
}
