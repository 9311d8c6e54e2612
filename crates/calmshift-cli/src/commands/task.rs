//! Task management commands for CLI.

use chrono::{DateTime, NaiveDate, Utc};
use clap::Subcommand;
use calmshift_core::{Action, NewTask, Priority, SortKey, TaskFilter, TaskPatch};

use crate::app::{print_json, resolve_id, App, CliResult};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task
    Add {
        /// Task title
        title: String,
        /// Task description
        #[arg(long)]
        description: Option<String>,
        /// low, medium or high (default: medium)
        #[arg(long, default_value = "medium")]
        priority: Priority,
        /// Due date: YYYY-MM-DD or RFC 3339
        #[arg(long, value_parser = parse_due)]
        due: Option<DateTime<Utc>>,
        /// Category label
        #[arg(long)]
        category: Option<String>,
        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
    },
    /// List tasks through the active filter
    List {
        /// Apply the stored sort key
        #[arg(long)]
        sorted: bool,
    },
    /// Get task details
    Show {
        /// Task ID or unique prefix
        id: String,
    },
    /// Update a task
    Update {
        /// Task ID or unique prefix
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New description
        #[arg(long, conflicts_with = "clear_description")]
        description: Option<String>,
        /// Remove the description
        #[arg(long)]
        clear_description: bool,
        /// New priority
        #[arg(long)]
        priority: Option<Priority>,
        /// New due date
        #[arg(long, value_parser = parse_due, conflicts_with = "clear_due")]
        due: Option<DateTime<Utc>>,
        /// Remove the due date
        #[arg(long)]
        clear_due: bool,
        /// New category
        #[arg(long)]
        category: Option<String>,
        /// Comma-separated tags (replaces existing)
        #[arg(long)]
        tags: Option<String>,
        /// Set completed status
        #[arg(long)]
        completed: Option<bool>,
    },
    /// Flip a task between open and completed
    Toggle {
        /// Task ID or unique prefix
        id: String,
    },
    /// Delete a task
    Delete {
        /// Task ID or unique prefix
        id: String,
    },
    /// Delete every completed task
    ClearCompleted,
    /// Set the list filter: all, active or completed
    Filter { filter: TaskFilter },
    /// Set the sort key: due_date, priority, created_at or title
    Sort { key: SortKey },
    /// Counts including overdue tasks
    Stats,
}

fn parse_due(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| d.and_utc())
        .ok_or_else(|| format!("invalid date '{raw}' (expected YYYY-MM-DD or RFC 3339)"))
}

fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn task_id(app: &App, wanted: &str) -> CliResult<String> {
    let ids = app.state().tasks.tasks().iter().map(|t| t.id.as_str());
    resolve_id(ids, wanted, "task")
}

pub fn run(action: TaskAction) -> CliResult {
    let mut app = App::open()?;

    match action {
        TaskAction::Add {
            title,
            description,
            priority,
            due,
            category,
            tags,
        } => {
            let task = NewTask {
                title,
                description,
                completed: false,
                priority,
                due_date: due,
                category,
                tags: tags.as_deref().map(split_tags).unwrap_or_default(),
            };
            let before = app.state().tasks.tasks().len();
            let state = app.dispatch(Action::AddTask { task });
            if state.tasks.tasks().len() == before {
                app.save()?;
                let message = state.tasks.error().unwrap_or("task rejected").to_string();
                return Err(message.into());
            }
            if let Some(task) = state.tasks.tasks().last() {
                println!("Task created: {}", task.id);
                print_json(task)?;
            }
        }
        TaskAction::List { sorted } => {
            let tasks = &app.state().tasks;
            if sorted {
                print_json(&tasks.visible_tasks())?;
            } else {
                print_json(&tasks.filtered_tasks())?;
            }
            return Ok(());
        }
        TaskAction::Show { id } => {
            let id = task_id(&app, &id)?;
            print_json(&app.state().tasks.task_by_id(&id))?;
            return Ok(());
        }
        TaskAction::Update {
            id,
            title,
            description,
            clear_description,
            priority,
            due,
            clear_due,
            category,
            tags,
            completed,
        } => {
            let id = task_id(&app, &id)?;
            let patch = TaskPatch {
                title,
                description: if clear_description {
                    Some(None)
                } else {
                    description.map(Some)
                },
                completed,
                priority,
                due_date: if clear_due { Some(None) } else { due.map(Some) },
                category: category.map(Some),
                tags: tags.as_deref().map(split_tags),
            };
            let state = app.dispatch(Action::UpdateTask {
                id: id.clone(),
                patch,
            });
            if let Some(err) = state.tasks.error() {
                let message = err.to_string();
                app.save()?;
                return Err(message.into());
            }
            println!("Task updated:");
            print_json(&state.tasks.task_by_id(&id))?;
        }
        TaskAction::Toggle { id } => {
            let id = task_id(&app, &id)?;
            let state = app.dispatch(Action::ToggleTaskComplete { id: id.clone() });
            print_json(&state.tasks.task_by_id(&id))?;
        }
        TaskAction::Delete { id } => {
            let id = task_id(&app, &id)?;
            app.dispatch(Action::DeleteTask { id: id.clone() });
            println!("Task deleted: {id}");
        }
        TaskAction::ClearCompleted => {
            let before = app.state().tasks.tasks().len();
            let state = app.dispatch(Action::ClearCompletedTasks);
            println!("Removed {} completed task(s)", before - state.tasks.tasks().len());
        }
        TaskAction::Filter { filter } => {
            let state = app.dispatch(Action::SetFilter { filter });
            print_json(&state.tasks.filtered_tasks())?;
        }
        TaskAction::Sort { key } => {
            let state = app.dispatch(Action::SetSortBy { sort_by: key });
            print_json(&state.tasks.visible_tasks())?;
        }
        TaskAction::Stats => {
            let now = app.store().now();
            print_json(&app.state().tasks.task_stats(now))?;
            return Ok(());
        }
    }

    app.save()
}
