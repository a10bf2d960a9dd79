use std::collections::HashSet;

use chrono::NaiveDate;

use super::conversation::Conversation;
use super::dates::format_date_key;
use super::labels::format_task_when;
use super::task::Task;
use super::views::{TaskViews, ViewMode, open_date_keys};

pub const DEFAULT_UPCOMING_LIMIT: usize = 5;

/// A task joined with its conversation, ready to render as a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskEntry<'a> {
    pub task: &'a Task,
    pub conversation: &'a Conversation,
    /// `"<name> · <when>"`, or just the name for undated tasks.
    pub title: String,
    pub subtitle: String,
    pub overdue: bool,
}

/// Session state of the tasks calendar overlay.
///
/// Tasks are loaded once when the overlay opens and dropped when it closes;
/// completing or deleting removes them locally right away.
#[derive(Debug, Clone)]
pub struct TasksOverlay {
    open: bool,
    tasks: Vec<Task>,
    view_mode: ViewMode,
    selected_date: Option<NaiveDate>,
    upcoming_limit: usize,
}

impl Default for TasksOverlay {
    fn default() -> Self {
        Self::new(DEFAULT_UPCOMING_LIMIT)
    }
}

impl TasksOverlay {
    pub fn new(upcoming_limit: usize) -> Self {
        Self {
            open: false,
            tasks: Vec::new(),
            view_mode: ViewMode::default(),
            selected_date: None,
            upcoming_limit,
        }
    }

    pub fn open(&mut self, tasks: Vec<Task>) {
        log::debug!("Opening tasks overlay with {} task(s)", tasks.len());
        self.tasks = tasks;
        self.selected_date = None;
        self.open = true;
    }

    pub fn close(&mut self) {
        self.tasks.clear();
        self.selected_date = None;
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// Pure state change; the loaded tasks are reused.
    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.selected_date
    }

    pub fn select_date(&mut self, date: NaiveDate) {
        self.selected_date = Some(date);
    }

    pub fn clear_selection(&mut self) {
        self.selected_date = None;
    }

    pub fn upcoming_limit(&self) -> usize {
        self.upcoming_limit
    }

    fn take(&mut self, task_id: &str) -> Option<Task> {
        let idx = self.tasks.iter().position(|t| t.id == task_id)?;
        Some(self.tasks.remove(idx))
    }

    /// Remove the task ahead of the server confirming completion.
    pub fn complete_task(&mut self, task_id: &str) -> Option<Task> {
        let task = self.take(task_id);
        if task.is_some() {
            log::info!("Completed task {}", task_id);
        }
        task
    }

    pub fn delete_task(&mut self, task_id: &str) -> Option<Task> {
        let task = self.take(task_id);
        if task.is_some() {
            log::info!("Deleted task {}", task_id);
        }
        task
    }

    /// Put back a task whose completion or deletion the server rejected.
    pub fn restore_task(&mut self, task: Task) {
        if self.tasks.iter().any(|t| t.id == task.id) {
            return;
        }
        log::warn!("Restoring task {} after failed update", task.id);
        self.tasks.push(task);
    }

    pub fn views(&self, today: NaiveDate) -> TaskViews<'_> {
        TaskViews::new(&self.tasks, today)
    }

    /// The list the panel shows: the selected day if any, otherwise the
    /// overdue backlog or the mode's default ordering.
    pub fn visible_tasks(&self, today: NaiveDate) -> Vec<&Task> {
        let views = self.views(today);
        if self.selected_date.is_some() {
            return views.for_date(self.selected_date);
        }
        match self.view_mode {
            ViewMode::Overdue => views.overdue(),
            mode => views.to_display(mode, self.upcoming_limit),
        }
    }

    pub fn days_with_tasks(&self, today: NaiveDate) -> HashSet<String> {
        self.views(today).days_with_tasks()
    }

    pub fn has_tasks_on(&self, year: i32, month_index: u32, day: u32) -> bool {
        let key = format_date_key(year, month_index, day);
        open_date_keys(&self.tasks).any(|k| k == key)
    }

    /// Visible tasks joined with their conversations. Tasks without a
    /// resolvable conversation are left out.
    pub fn entries<'a>(
        &'a self,
        conversations: &'a [Conversation],
        today: NaiveDate,
    ) -> Vec<TaskEntry<'a>> {
        self.visible_tasks(today)
            .into_iter()
            .filter_map(|task| {
                let conversation_id = task.conversation_id.as_deref()?;
                let conversation = conversations.iter().find(|c| c.id == conversation_id)?;
                let when = format_task_when(task);
                let title = if when.is_empty() {
                    conversation.name.clone()
                } else {
                    format!("{} · {}", conversation.name, when)
                };
                Some(TaskEntry {
                    task,
                    conversation,
                    title,
                    subtitle: task.text.clone(),
                    overdue: task.is_overdue(today),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::task::TaskStatus;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> Vec<Task> {
        vec![
            Task::new("t1", "Cobrar resposta")
                .with_date("2025-01-01")
                .with_conversation("conv_1"),
            Task::new("t2", "Enviar cotação")
                .with_date("2025-01-10")
                .with_time("14:00")
                .with_conversation("conv_1"),
            Task::new("t3", "Sem conversa")
                .with_date("2025-01-10")
                .with_conversation("ghost"),
            Task::new("t4", "Lixo").with_date("not-a-date"),
        ]
    }

    fn opened() -> TasksOverlay {
        let mut overlay = TasksOverlay::default();
        overlay.open(sample());
        overlay
    }

    #[test]
    fn open_and_close_lifecycle() {
        let mut overlay = opened();
        assert!(overlay.is_open());
        overlay.select_date(ymd(2025, 1, 10));
        overlay.close();
        assert!(!overlay.is_open());
        assert!(overlay.tasks().is_empty());
        assert_eq!(overlay.selected_date(), None);
    }

    #[test]
    fn default_view_orders_future_then_past() {
        let overlay = opened();
        let ids: Vec<_> = overlay
            .visible_tasks(ymd(2025, 1, 5))
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, vec!["t2", "t3", "t1"]);
    }

    #[test]
    fn selection_overrides_mode() {
        let mut overlay = opened();
        overlay.set_view_mode(ViewMode::Year);
        overlay.select_date(ymd(2025, 1, 1));
        let visible = overlay.visible_tasks(ymd(2025, 1, 5));
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "t1");

        overlay.clear_selection();
        assert_eq!(overlay.visible_tasks(ymd(2025, 1, 5)).len(), 3);
    }

    #[test]
    fn overdue_mode_lists_backlog() {
        let mut overlay = opened();
        overlay.set_view_mode(ViewMode::Overdue);
        let visible = overlay.visible_tasks(ymd(2025, 1, 5));
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "t1");
    }

    #[test]
    fn complete_delete_and_restore() {
        let mut overlay = opened();
        let done = overlay.complete_task("t1").unwrap();
        assert!(overlay.complete_task("t1").is_none());
        assert!(overlay.delete_task("t2").is_some());
        assert_eq!(overlay.tasks().len(), 2);

        overlay.restore_task(done.clone());
        overlay.restore_task(done);
        assert_eq!(overlay.tasks().len(), 3);
    }

    #[test]
    fn entries_drop_unresolved_conversations() {
        let overlay = opened();
        let conversations = vec![Conversation::new("conv_1", "João Silva")];
        let entries = overlay.entries(&conversations, ymd(2025, 1, 5));

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "João Silva · 10 de jan. às 14:00");
        assert_eq!(entries[0].subtitle, "Enviar cotação");
        assert!(!entries[0].overdue);
        assert_eq!(entries[1].title, "João Silva · 1 de jan.");
        assert!(entries[1].overdue);
    }

    #[test]
    fn completed_tasks_do_not_come_back() {
        let mut done = Task::new("t1", "Ligar")
            .with_date("2025-01-01")
            .with_conversation("conv_1");
        done.status = TaskStatus::Done;
        let mut overlay = TasksOverlay::default();
        overlay.open(vec![done]);
        overlay.set_view_mode(ViewMode::Overdue);

        assert!(overlay.visible_tasks(ymd(2025, 1, 5)).is_empty());
        assert!(!overlay.has_tasks_on(2025, 0, 1));
    }

    #[test]
    fn grid_dots_agree_with_day_set() {
        let mut overlay = TasksOverlay::default();
        overlay.open(vec![
            Task::new("a", "x").with_date("2025-1-5"),
            Task::new("b", "x").with_date(" 2025-01-07T10:00:00Z"),
        ]);
        let days = overlay.days_with_tasks(ymd(2025, 1, 5));
        for day in 1..=31 {
            let key = format_date_key(2025, 0, day);
            assert_eq!(overlay.has_tasks_on(2025, 0, day), days.contains(&key), "{key}");
        }
        assert!(overlay.has_tasks_on(2025, 0, 5));
        assert!(!overlay.has_tasks_on(2025, u32::MAX, 5));
    }

    #[test]
    fn grid_dots() {
        let overlay = opened();
        assert!(overlay.has_tasks_on(2025, 0, 10));
        assert!(!overlay.has_tasks_on(2025, 0, 11));
        let days = overlay.days_with_tasks(ymd(2025, 1, 5));
        assert_eq!(days.len(), 2);
    }
}
