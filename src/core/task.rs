use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::dates::{parse_local_date, today_key};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    Pending,
    Done,
    Other(String),
}

impl TaskStatus {
    pub fn as_keyword(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Done => "done",
            Self::Other(s) => s,
        }
    }

    pub fn from_keyword(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "pending" | "open" | "todo" => Self::Pending,
            "done" | "completed" => Self::Done,
            _ => Self::Other(s.trim().to_string()),
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        Self::Pending
    }
}

/// A follow-up task on a client conversation.
///
/// `date` stays the raw string the server sent; only its first ten
/// characters matter for bucketing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub date: Option<String>,
    /// Wall-clock `HH:MM`, independent of any time inside `date`.
    pub time: Option<String>,
    pub text: String,
    /// Weak reference to a conversation owned by the conversation list.
    pub conversation_id: Option<String>,
    pub status: TaskStatus,
}

impl Task {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            date: None,
            time: None,
            text: text.into(),
            conversation_id: None,
            status: TaskStatus::Pending,
        }
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }

    pub fn with_conversation(mut self, conversation_id: impl Into<String>) -> Self {
        self.conversation_id = Some(conversation_id.into());
        self
    }

    /// Canonical `YYYY-MM-DD` of the due date, or `None` when the task has
    /// no usable date. `"2025-1-5"` and `" 2025-01-05"` share one key.
    pub fn date_key(&self) -> Option<String> {
        self.due_date().map(today_key)
    }

    pub fn due_date(&self) -> Option<NaiveDate> {
        self.date.as_deref().and_then(parse_local_date)
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.due_date().is_some_and(|due| due < today)
    }
}

/// Due strictly before `today`. Undated or unparseable tasks are never overdue.
pub fn is_task_overdue(task: &Task, today: NaiveDate) -> bool {
    task.is_overdue(today)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 5).unwrap()
    }

    #[test]
    fn overdue_only_before_today() {
        let yesterday = Task::new("a", "x").with_date("2025-01-04");
        let same_day = Task::new("b", "x").with_date("2025-01-05T23:59:00Z");
        let tomorrow = Task::new("c", "x").with_date("2025-01-06");
        let undated = Task::new("d", "x");

        assert!(is_task_overdue(&yesterday, today()));
        assert!(!is_task_overdue(&same_day, today()));
        assert!(!is_task_overdue(&tomorrow, today()));
        assert!(!is_task_overdue(&undated, today()));
    }

    #[test]
    fn malformed_date_is_not_overdue() {
        let task = Task::new("x", "x").with_date("not-a-date");
        assert_eq!(task.due_date(), None);
        assert!(!task.is_overdue(today()));
    }

    #[test]
    fn key_ignores_time_of_day() {
        let task = Task::new("x", "x").with_date("2025-11-20T15:00:00Z");
        assert_eq!(task.date_key().as_deref(), Some("2025-11-20"));
    }

    #[test]
    fn key_is_canonical() {
        let loose = Task::new("x", "x").with_date("2025-1-5");
        assert_eq!(loose.date_key().as_deref(), Some("2025-01-05"));
        assert_eq!(Task::new("y", "y").with_date("nope").date_key(), None);
    }

    #[test]
    fn status_keywords() {
        assert_eq!(TaskStatus::from_keyword("pending"), TaskStatus::Pending);
        assert_eq!(TaskStatus::from_keyword("DONE"), TaskStatus::Done);
        assert_eq!(
            TaskStatus::from_keyword("snoozed"),
            TaskStatus::Other("snoozed".to_string())
        );
        assert_eq!(TaskStatus::Other("snoozed".into()).as_keyword(), "snoozed");
    }
}
