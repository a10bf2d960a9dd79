use std::collections::HashSet;

use chrono::{NaiveDate, NaiveTime};

use super::dates::{end_of_week, is_same_month, is_same_year, start_of_week, today_key};
use super::task::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Day,
    Week,
    Month,
    Year,
    Overdue,
}

impl ViewMode {
    pub const ALL: [ViewMode; 5] = [
        ViewMode::Day,
        ViewMode::Week,
        ViewMode::Month,
        ViewMode::Year,
        ViewMode::Overdue,
    ];

    pub fn as_keyword(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
            Self::Overdue => "overdue",
        }
    }

    pub fn from_keyword(s: &str) -> Option<Self> {
        match s {
            "day" => Some(Self::Day),
            "week" => Some(Self::Week),
            "month" => Some(Self::Month),
            "year" => Some(Self::Year),
            "overdue" => Some(Self::Overdue),
            _ => None,
        }
    }
}

/// Date-bucketed projections over the loaded task list.
///
/// Every projection excludes tasks whose date does not parse.
pub struct TaskViews<'a> {
    tasks: &'a [Task],
    today: NaiveDate,
}

impl<'a> TaskViews<'a> {
    pub fn new(tasks: &'a [Task], today: NaiveDate) -> Self {
        Self { tasks, today }
    }

    /// Open tasks with a usable date. Completed tasks never show up in a
    /// bucket, even when the server still lists them.
    fn dated(&self) -> impl Iterator<Item = (NaiveDate, &'a Task)> + '_ {
        self.tasks
            .iter()
            .filter(|t| !t.status.is_done())
            .filter_map(|t| t.due_date().map(|d| (d, t)))
    }

    /// Exact key match against today; no date arithmetic involved.
    pub fn today(&self) -> Vec<&'a Task> {
        let key = today_key(self.today);
        self.dated()
            .filter(|(_, t)| t.date_key().as_deref() == Some(key.as_str()))
            .map(|(_, t)| t)
            .collect()
    }

    pub fn this_week(&self) -> Vec<&'a Task> {
        let now = self.today.and_time(NaiveTime::MIN);
        let (start, end) = (start_of_week(now), end_of_week(now));
        sorted_ascending(
            self.dated()
                .filter(|(d, _)| {
                    let at = d.and_time(NaiveTime::MIN);
                    at >= start && at <= end
                })
                .collect(),
        )
    }

    /// Rest of the current month, today included.
    pub fn upcoming_this_month(&self) -> Vec<&'a Task> {
        sorted_ascending(
            self.dated()
                .filter(|(d, _)| is_same_month(*d, self.today) && *d >= self.today)
                .collect(),
        )
    }

    /// Oldest first.
    pub fn overdue(&self) -> Vec<&'a Task> {
        sorted_ascending(self.dated().filter(|(d, _)| *d < self.today).collect())
    }

    pub fn for_date(&self, selected: Option<NaiveDate>) -> Vec<&'a Task> {
        let Some(selected) = selected else {
            return Vec::new();
        };
        let key = today_key(selected);
        self.dated()
            .filter(|(_, t)| t.date_key().as_deref() == Some(key.as_str()))
            .map(|(_, t)| t)
            .collect()
    }

    /// Default list when no date is selected: today and later ascending,
    /// then the past with the most recently missed first.
    ///
    /// Month and year modes only consider their own period and keep at most
    /// `limit` entries (`0` keeps everything).
    pub fn to_display(&self, mode: ViewMode, limit: usize) -> Vec<&'a Task> {
        let candidates = self.dated().filter(|(d, _)| match mode {
            ViewMode::Month => is_same_month(*d, self.today),
            ViewMode::Year => is_same_year(*d, self.today),
            _ => true,
        });

        let (upcoming, past): (Vec<_>, Vec<_>) = candidates.partition(|(d, _)| *d >= self.today);

        let mut ordered = sorted_ascending(upcoming);
        let mut past = sorted_ascending(past);
        past.reverse();
        ordered.extend(past);

        if matches!(mode, ViewMode::Month | ViewMode::Year) && limit > 0 {
            ordered.truncate(limit);
        }
        ordered
    }

    /// Distinct date keys that have at least one task, for grid dots.
    pub fn days_with_tasks(&self) -> HashSet<String> {
        open_date_keys(self.tasks).collect()
    }
}

/// Normalized date keys of the open tasks, one per task. Grid dots and the
/// days-with-tasks set both come from here.
pub fn open_date_keys(tasks: &[Task]) -> impl Iterator<Item = String> + '_ {
    tasks
        .iter()
        .filter(|t| !t.status.is_done())
        .filter_map(Task::date_key)
}

fn sorted_ascending<'a>(mut dated: Vec<(NaiveDate, &'a Task)>) -> Vec<&'a Task> {
    dated.sort_by_key(|(d, _)| *d);
    dated.into_iter().map(|(_, t)| t).collect()
}
