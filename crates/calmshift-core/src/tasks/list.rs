//! Task list slice with filter/sort projections.
//!
//! Unknown ids are silent no-ops. The only rejected input is a blank
//! title, which is reported both as a returned [`ValidationError`] and in
//! the `error` slot so a view bound to the state can show it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::task::{validate_title, NewTask, Task, TaskPatch};
use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Active => !task.completed,
            TaskFilter::Completed => task.completed,
        }
    }
}

impl FromStr for TaskFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(TaskFilter::All),
            "active" => Ok(TaskFilter::Active),
            "completed" | "done" => Ok(TaskFilter::Completed),
            other => Err(format!("unknown filter: {other}")),
        }
    }
}

impl fmt::Display for TaskFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TaskFilter::All => "all",
            TaskFilter::Active => "active",
            TaskFilter::Completed => "completed",
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    DueDate,
    Priority,
    #[default]
    CreatedAt,
    Title,
}

impl SortKey {
    /// Ordering used by [`TaskState::visible_tasks`].
    pub fn compare(&self, a: &Task, b: &Task) -> Ordering {
        match self {
            SortKey::DueDate => match (a.due_date, b.due_date) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            SortKey::Priority => b.priority.cmp(&a.priority),
            SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
            SortKey::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "due_date" | "due-date" | "dueDate" | "due" => Ok(SortKey::DueDate),
            "priority" => Ok(SortKey::Priority),
            "created_at" | "created-at" | "createdAt" | "created" => Ok(SortKey::CreatedAt),
            "title" => Ok(SortKey::Title),
            other => Err(format!("unknown sort key: {other}")),
        }
    }
}

/// Counts over the whole collection, ignoring the active filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub active: usize,
    pub overdue: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskState {
    tasks: Vec<Task>,
    #[serde(default)]
    filter: TaskFilter,
    #[serde(default)]
    sort_by: SortKey,
    #[serde(default)]
    is_loading: bool,
    #[serde(default)]
    error: Option<String>,
}

impl TaskState {
    // ── Selectors ────────────────────────────────────────────────────

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn filter(&self) -> TaskFilter {
        self.filter
    }

    pub fn sort_by(&self) -> SortKey {
        self.sort_by
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn task_by_id(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Tasks matching the active filter, in insertion order.
    pub fn filtered_tasks(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|t| self.filter.matches(t)).collect()
    }

    /// Tasks matching the active filter, ordered by `sort_by`.
    pub fn visible_tasks(&self) -> Vec<&Task> {
        let mut tasks = self.filtered_tasks();
        tasks.sort_by(|a, b| self.sort_by.compare(a, b));
        tasks
    }

    pub fn task_stats(&self, now: DateTime<Utc>) -> TaskStats {
        let completed = self.tasks.iter().filter(|t| t.completed).count();
        TaskStats {
            total: self.tasks.len(),
            completed,
            active: self.tasks.len() - completed,
            overdue: self.tasks.iter().filter(|t| t.is_overdue(now)).count(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn add_task(
        &mut self,
        new: NewTask,
        id: String,
        now: DateTime<Utc>,
    ) -> Result<&Task, ValidationError> {
        if let Err(err) = validate_title(&new.title) {
            self.error = Some(err.to_string());
            return Err(err);
        }
        self.tasks.push(new.into_task(id, now));
        self.error = None;
        Ok(&self.tasks[self.tasks.len() - 1])
    }

    /// Merge `patch` into the task with `id`. Returns `Ok(None)` if no
    /// such task exists.
    pub fn update_task(
        &mut self,
        id: &str,
        patch: TaskPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<&Task>, ValidationError> {
        let Some(index) = self.tasks.iter().position(|t| t.id == id) else {
            return Ok(None);
        };
        if let Some(title) = &patch.title {
            if let Err(err) = validate_title(title) {
                self.error = Some(err.to_string());
                return Err(err);
            }
        }
        let task = &mut self.tasks[index];
        patch.apply(task);
        task.updated_at = now;
        self.error = None;
        Ok(Some(&self.tasks[index]))
    }

    /// Returns whether a task was removed.
    pub fn delete_task(&mut self, id: &str) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.error = None;
        self.tasks.len() != before
    }

    /// Flip `completed`. Returns the new value, or `None` for unknown ids.
    pub fn toggle_task_complete(&mut self, id: &str, now: DateTime<Utc>) -> Option<bool> {
        let task = self.tasks.iter_mut().find(|t| t.id == id)?;
        task.completed = !task.completed;
        task.updated_at = now;
        Some(task.completed)
    }

    pub fn set_filter(&mut self, filter: TaskFilter) {
        self.filter = filter;
    }

    pub fn set_sort_by(&mut self, sort_by: SortKey) {
        self.sort_by = sort_by;
    }

    /// Returns how many tasks were removed.
    pub fn clear_completed_tasks(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| !t.completed);
        before - self.tasks.len()
    }

    pub fn set_loading(&mut self, is_loading: bool) {
        self.is_loading = is_loading;
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::Priority;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 1, 8, 30, 0).unwrap()
    }

    fn add(list: &mut TaskState, id: &str, new: NewTask, at: DateTime<Utc>) {
        list.add_task(new, id.into(), at).unwrap();
    }

    #[test]
    fn add_assigns_id_and_timestamps() {
        let mut list = TaskState::default();
        list.set_error(Some("stale".into()));
        let task = list
            .add_task(NewTask::new("Buy milk").priority(Priority::Low), "t-1".into(), t0())
            .unwrap()
            .clone();

        assert_eq!(task.id, "t-1");
        assert_eq!(task.created_at, t0());
        assert_eq!(task.updated_at, t0());
        assert!(!task.completed);
        assert!(list.error().is_none());
    }

    #[test]
    fn add_blank_title_sets_error_and_keeps_collection() {
        let mut list = TaskState::default();
        let err = list.add_task(NewTask::new("  "), "t-1".into(), t0()).unwrap_err();
        assert_eq!(err.to_string(), "title is required");
        assert!(list.tasks().is_empty());
        assert_eq!(list.error(), Some("title is required"));
    }

    #[test]
    fn update_merges_and_refreshes_updated_at() {
        let mut list = TaskState::default();
        add(&mut list, "t-1", NewTask::new("Draft").tags(["work"]), t0());

        let later = t0() + Duration::minutes(5);
        let patch = TaskPatch {
            title: Some("Draft v2".into()),
            description: Some(Some("second pass".into())),
            priority: Some(Priority::High),
            ..Default::default()
        };
        let task = list.update_task("t-1", patch, later).unwrap().unwrap().clone();

        assert_eq!(task.title, "Draft v2");
        assert_eq!(task.description.as_deref(), Some("second pass"));
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.tags, vec!["work".to_string()]);
        assert_eq!(task.created_at, t0());
        assert_eq!(task.updated_at, later);
    }

    #[test]
    fn update_can_clear_optional_fields() {
        let mut list = TaskState::default();
        add(&mut list, "t-1", NewTask::new("Report").due(t0()), t0());
        let patch = TaskPatch {
            due_date: Some(None),
            ..Default::default()
        };
        list.update_task("t-1", patch, t0()).unwrap();
        assert!(list.task_by_id("t-1").unwrap().due_date.is_none());
    }

    #[test]
    fn update_unknown_id_is_noop() {
        let mut list = TaskState::default();
        add(&mut list, "t-1", NewTask::new("Report"), t0());
        let before = list.clone();
        let out = list.update_task("t-404", TaskPatch::default(), t0()).unwrap();
        assert!(out.is_none());
        assert_eq!(list, before);
    }

    #[test]
    fn update_rejects_blank_title() {
        let mut list = TaskState::default();
        add(&mut list, "t-1", NewTask::new("Report"), t0());
        let patch = TaskPatch {
            title: Some("".into()),
            ..Default::default()
        };
        assert!(list.update_task("t-1", patch, t0()).is_err());
        assert_eq!(list.task_by_id("t-1").unwrap().title, "Report");
        assert!(list.error().is_some());
    }

    #[test]
    fn delete_and_toggle() {
        let mut list = TaskState::default();
        add(&mut list, "t-1", NewTask::new("One"), t0());
        add(&mut list, "t-2", NewTask::new("Two"), t0());

        assert_eq!(list.toggle_task_complete("t-1", t0()), Some(true));
        assert_eq!(list.toggle_task_complete("t-1", t0()), Some(false));
        assert_eq!(list.toggle_task_complete("nope", t0()), None);

        assert!(list.delete_task("t-2"));
        assert!(!list.delete_task("t-2"));
        assert_eq!(list.tasks().len(), 1);
    }

    #[test]
    fn filter_projection() {
        let mut list = TaskState::default();
        add(&mut list, "t-1", NewTask::new("Buy milk").priority(Priority::Low), t0());

        list.set_filter(TaskFilter::Completed);
        assert!(list.filtered_tasks().is_empty());
        list.set_filter(TaskFilter::All);
        assert_eq!(list.filtered_tasks().len(), 1);

        list.toggle_task_complete("t-1", t0());
        list.set_filter(TaskFilter::Active);
        assert!(list.filtered_tasks().is_empty());
    }

    #[test]
    fn filtered_tasks_ignores_sort_key() {
        let mut list = TaskState::default();
        add(&mut list, "t-1", NewTask::new("b"), t0());
        add(&mut list, "t-2", NewTask::new("a"), t0());
        list.set_sort_by(SortKey::Title);

        let ids: Vec<_> = list.filtered_tasks().iter().map(|t| t.id.clone()).collect();
        assert_eq!(ids, ["t-1", "t-2"]);
        let ids: Vec<_> = list.visible_tasks().iter().map(|t| t.id.clone()).collect();
        assert_eq!(ids, ["t-2", "t-1"]);
    }

    #[test]
    fn visible_tasks_sorts_by_due_date_then_undated() {
        let mut list = TaskState::default();
        add(&mut list, "none", NewTask::new("x"), t0());
        add(&mut list, "late", NewTask::new("y").due(t0() + Duration::days(2)), t0());
        add(&mut list, "soon", NewTask::new("z").due(t0() + Duration::days(1)), t0());
        list.set_sort_by(SortKey::DueDate);

        let ids: Vec<_> = list.visible_tasks().iter().map(|t| t.id.clone()).collect();
        assert_eq!(ids, ["soon", "late", "none"]);
    }

    #[test]
    fn visible_tasks_sorts_priority_high_first() {
        let mut list = TaskState::default();
        add(&mut list, "lo", NewTask::new("x").priority(Priority::Low), t0());
        add(&mut list, "hi", NewTask::new("y").priority(Priority::High), t0());
        add(&mut list, "mid", NewTask::new("z"), t0());
        list.set_sort_by(SortKey::Priority);

        let ids: Vec<_> = list.visible_tasks().iter().map(|t| t.id.clone()).collect();
        assert_eq!(ids, ["hi", "mid", "lo"]);
    }

    #[test]
    fn visible_tasks_sorts_created_at_oldest_first() {
        let mut list = TaskState::default();
        add(&mut list, "newer", NewTask::new("x"), t0() + Duration::hours(1));
        add(&mut list, "older", NewTask::new("y"), t0());
        list.set_sort_by(SortKey::CreatedAt);

        let ids: Vec<_> = list.visible_tasks().iter().map(|t| t.id.clone()).collect();
        assert_eq!(ids, ["older", "newer"]);
    }

    #[test]
    fn visible_tasks_title_sort_ignores_case() {
        let mut list = TaskState::default();
        add(&mut list, "lower-b", NewTask::new("b"), t0());
        add(&mut list, "upper-a", NewTask::new("A"), t0());
        add(&mut list, "upper-c", NewTask::new("C"), t0());
        list.set_sort_by(SortKey::Title);

        let ids: Vec<_> = list.visible_tasks().iter().map(|t| t.id.clone()).collect();
        assert_eq!(ids, ["upper-a", "lower-b", "upper-c"]);
    }

    #[test]
    fn toggle_refreshes_updated_at() {
        let mut list = TaskState::default();
        add(&mut list, "t-1", NewTask::new("Stretch"), t0());

        let later = t0() + Duration::hours(1);
        list.toggle_task_complete("t-1", later);

        let task = list.task_by_id("t-1").unwrap();
        assert_eq!(task.updated_at, later);
        assert_eq!(task.created_at, t0());
    }

    #[test]
    fn stats_track_overdue() {
        let mut list = TaskState::default();
        add(&mut list, "t-1", NewTask::new("Late").due(t0() - Duration::days(1)), t0());
        add(&mut list, "t-2", NewTask::new("Fine"), t0());

        let stats = list.task_stats(t0());
        assert_eq!(
            stats,
            TaskStats {
                total: 2,
                completed: 0,
                active: 2,
                overdue: 1
            }
        );

        list.toggle_task_complete("t-1", t0());
        let stats = list.task_stats(t0());
        assert_eq!(stats.overdue, 0);
        assert_eq!(stats.completed, 1);
    }

    #[test]
    fn clear_completed_keeps_open_tasks() {
        let mut list = TaskState::default();
        add(&mut list, "t-1", NewTask::new("One"), t0());
        add(&mut list, "t-2", NewTask::new("Two"), t0());
        list.toggle_task_complete("t-2", t0());

        assert_eq!(list.clear_completed_tasks(), 1);
        assert_eq!(list.tasks().len(), 1);
        assert_eq!(list.tasks()[0].id, "t-1");
    }

    #[test]
    fn loading_and_error_bookkeeping() {
        let mut list = TaskState::default();
        list.set_loading(true);
        assert!(list.is_loading());
        list.set_error(Some("offline".into()));
        assert_eq!(list.error(), Some("offline"));
        list.clear_error();
        assert!(list.error().is_none());
    }
}
