//! Task list slice.

mod list;
mod task;

pub use list::{SortKey, TaskFilter, TaskState, TaskStats};
pub use task::{NewTask, Priority, Task, TaskPatch};
