use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::TodoError;

/// Stable identifier assigned to a task when it is created.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    pub fn new() -> TaskId {
        TaskId(Uuid::new_v4())
    }

    /// First eight hex digits, used for table output and prefix lookups.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }

    /// Whether `prefix` matches the start of this id (hyphens ignored).
    pub fn matches_prefix(&self, prefix: &str) -> bool {
        let needle: String = prefix
            .chars()
            .filter(|c| *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        !needle.is_empty() && self.0.simple().to_string().starts_with(&needle)
    }
}

impl Default for TaskId {
    fn default() -> Self {
        TaskId::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(TaskId)
    }
}

/// Represents a single to-do item.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier. Records stored without one get a fresh id on load.
    #[serde(default)]
    pub id: TaskId,
    /// Short title, may be empty.
    #[serde(alias = "task", default)]
    pub title: String,
    /// Free text description, may be empty.
    #[serde(default)]
    pub content: String,
    /// Creation time, captured once when the task is added.
    #[serde(default)]
    pub timestamp: String,
    /// When the task is due. `None` means "not set".
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_due")]
    pub due_date: Option<NaiveDateTime>,
    /// Completion in percent. Not clamped; unset until the first edit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_percentage: Option<i64>,
}

impl Task {
    /// Builds a new task stamped with the current local time.
    pub fn new(title: String, content: String, due_date: NaiveDateTime) -> Task {
        Task {
            id: TaskId::new(),
            title,
            content,
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
            due_date: Some(due_date),
            completion_percentage: None,
        }
    }

    /// Calendar date the task is due on, if any.
    pub fn due_day(&self) -> Option<NaiveDate> {
        self.due_date.map(|d| d.date())
    }
}

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Parses a due date entered by the user.
///
/// Accepts `YYYY-MM-DD` (taken as midnight), `YYYY-MM-DD HH:MM`,
/// `YYYY-MM-DD HH:MM:SS` and the `T`-separated ISO forms.
pub fn parse_due(input: &str) -> Result<NaiveDateTime, TodoError> {
    let s = input.trim();
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|d| d.and_time(NaiveTime::MIN))
        .map_err(|e| {
            TodoError::Validation(format!(
                "invalid due date '{}': {}. Use YYYY-MM-DD or YYYY-MM-DD HH:MM",
                s, e
            ))
        })
}

/// Reads a stored due date.
///
/// Besides chrono's own ISO form this takes RFC 3339 with an offset and the
/// `Date.toString()` text older blobs carry, e.g.
/// `Wed Jan 10 2024 09:00:00 GMT+0530 (India Standard Time)`. Offsets are
/// dropped; the wall-clock time as written is kept.
fn lenient_due<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let s = raw.trim();
    if s.is_empty() {
        return Ok(None);
    }
    if let Ok(dt) = s.parse::<NaiveDateTime>() {
        return Ok(Some(dt));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(Some(dt.naive_local()));
    }
    let head = s.split_whitespace().take(5).collect::<Vec<_>>().join(" ");
    if let Ok(dt) = NaiveDateTime::parse_from_str(&head, "%a %b %d %Y %H:%M:%S") {
        return Ok(Some(dt));
    }
    parse_due(s)
        .map(Some)
        .map_err(|_| serde::de::Error::custom(format!("unrecognised due date `{}`", s)))
}

/// Formats a due date for display.
pub fn format_due(due: Option<NaiveDateTime>) -> String {
    match due {
        Some(d) => d.format(DISPLAY_FORMAT).to_string(),
        None => "Not set".to_string(),
    }
}

/// Formats a completion percentage for display.
pub fn format_percentage(pct: Option<i64>) -> String {
    match pct {
        Some(p) => format!("{}%", p),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_due_accepts_plain_date_as_midnight() {
        let dt = parse_due("2024-01-10").unwrap();
        assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
        assert_eq!(dt.time(), NaiveTime::MIN);
    }

    #[test]
    fn parse_due_accepts_date_and_time() {
        let dt = parse_due(" 2024-01-10 17:30 ").unwrap();
        assert_eq!(format_due(Some(dt)), "2024-01-10 17:30");
    }

    #[test]
    fn parse_due_rejects_garbage() {
        assert!(matches!(parse_due("next tuesday"), Err(TodoError::Validation(_))));
    }

    #[test]
    fn legacy_record_without_id_uses_task_field_as_title() {
        let json = r#"[{"task":"Buy milk","content":"2 litres","timestamp":"1/1/2024, 10:00:00 AM"}]"#;
        let tasks: Vec<Task> = serde_json::from_str(json).unwrap();
        assert_eq!(tasks[0].title, "Buy milk");
        assert_eq!(tasks[0].due_date, None);
        assert_eq!(tasks[0].completion_percentage, None);
    }

    #[test]
    fn due_dates_from_older_blobs_are_read() {
        let json = r#"[
            {"task":"js","dueDate":"Wed Jan 10 2024 09:00:00 GMT+0530 (India Standard Time)"},
            {"task":"iso","dueDate":"2024-01-11T08:15:00"},
            {"task":"utc","dueDate":"2024-01-12T03:30:00.000Z"},
            {"task":"null","dueDate":null}
        ]"#;
        let tasks: Vec<Task> = serde_json::from_str(json).unwrap();
        let due: Vec<String> = tasks.iter().map(|t| format_due(t.due_date)).collect();
        assert_eq!(due, vec!["2024-01-10 09:00", "2024-01-11 08:15", "2024-01-12 03:30", "Not set"]);
    }

    #[test]
    fn unreadable_due_date_fails_the_record() {
        let json = r#"[{"task":"x","dueDate":"someday"}]"#;
        assert!(serde_json::from_str::<Vec<Task>>(json).is_err());
    }

    #[test]
    fn prefix_matching_ignores_case_and_hyphens() {
        let id: TaskId = "67e55044-10b1-426f-9247-bb680e5fe0c8".parse().unwrap();
        assert!(id.matches_prefix("67E55044-10"));
        assert!(!id.matches_prefix("68"));
        assert!(!id.matches_prefix(""));
        assert_eq!(id.short(), "67e55044");
    }
}
