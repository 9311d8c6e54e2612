//! # CalmShift Core Library
//!
//! Business state for the CalmShift productivity app: focus sessions,
//! the task list and motivational quotes. The view layer lives elsewhere;
//! this crate only holds state, applies commands and derives projections.
//!
//! ## Architecture
//!
//! - **Slices**: [`FocusState`], [`TaskState`] and [`QuoteState`] are plain
//!   values whose commands are synchronous transitions. Time and ids come
//!   in as arguments.
//! - **Store**: [`Store`] owns the current [`AppState`] snapshot, supplies
//!   the clock, id generator and random source, and applies [`Action`]s
//!   copy-on-write.
//! - **Storage**: [`Persistor`] writes whole snapshots to any
//!   [`KeyValueStore`] ([`SqliteStore`], [`MemoryStore`]).
//! - **Config**: TOML file with first-run timer settings and host options.

pub mod clock;
pub mod config;
pub mod error;
pub mod focus;
pub mod quotes;
pub mod storage;
pub mod store;
pub mod tasks;

pub use clock::{Clock, IdGenerator, ManualClock, SequentialIds, SystemClock, UuidGenerator};
pub use config::Config;
pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use focus::{FocusSession, FocusSettings, FocusSettingsPatch, FocusState, FocusStats, SessionType};
pub use quotes::{Quote, QuoteState};
pub use storage::{KeyValueStore, MemoryStore, Persistor, SqliteStore};
pub use store::{Action, AppState, Store};
pub use tasks::{NewTask, Priority, SortKey, Task, TaskFilter, TaskPatch, TaskState, TaskStats};
