//! State container for the three slices.
//!
//! The [`Store`] owns the current [`AppState`] behind an `Arc`. Commands
//! arrive as [`Action`] values and are applied copy-on-write: a snapshot
//! previously handed out by [`Store::snapshot`] is never mutated, so a
//! reader always sees a complete prior or next state.
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = Store::new(AppState::default());
//! store.dispatch(Action::StartSession { duration: Some(25), session_type: None, task_id: None });
//! let snapshot = store.snapshot();
//! ```

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::clock::{Clock, IdGenerator, SystemClock, UuidGenerator};
use crate::focus::{FocusSettings, FocusSettingsPatch, FocusState, SessionType};
use crate::quotes::{builtin_quotes, Quote, QuoteState};
use crate::tasks::{NewTask, SortKey, TaskFilter, TaskPatch, TaskState};

/// Complete snapshot of every slice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    #[serde(default)]
    pub focus: FocusState,
    #[serde(default)]
    pub tasks: TaskState,
    #[serde(default)]
    pub quotes: QuoteState,
}

impl AppState {
    /// First-run state: the given timer settings and a daily quote drawn
    /// from `pool`.
    pub fn initial<R: RngCore + ?Sized>(settings: FocusSettings, pool: &[Quote], rng: &mut R) -> Self {
        Self {
            focus: FocusState::with_settings(settings),
            tasks: TaskState::default(),
            quotes: QuoteState::seeded(pool, rng),
        }
    }

    /// [`AppState::initial`] with the built-in quotes and a thread-local rng.
    pub fn first_run(settings: FocusSettings) -> Self {
        Self::initial(settings, &builtin_quotes(), &mut rand::thread_rng())
    }

    /// Re-derive cached fields after loading from storage.
    pub fn rehydrated(mut self) -> Self {
        self.focus.recompute_stats();
        self
    }
}

/// Every command the slices understand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    // focus
    StartSession {
        #[serde(default)]
        duration: Option<u32>,
        #[serde(default)]
        session_type: Option<SessionType>,
        #[serde(default)]
        task_id: Option<String>,
    },
    PauseSession,
    ResumeSession,
    StopSession {
        #[serde(default)]
        completed: bool,
        #[serde(default)]
        notes: Option<String>,
    },
    UpdateTimeRemaining {
        seconds: i64,
    },
    StartBreak,
    UpdateBreakTimeRemaining {
        seconds: i64,
    },
    EndBreak,
    UpdateSettings {
        patch: FocusSettingsPatch,
    },
    ResetSessionCount,
    AddSessionNote {
        session_id: String,
        notes: String,
    },
    DeleteSession {
        session_id: String,
    },

    // tasks
    AddTask {
        task: NewTask,
    },
    UpdateTask {
        id: String,
        patch: TaskPatch,
    },
    DeleteTask {
        id: String,
    },
    ToggleTaskComplete {
        id: String,
    },
    SetFilter {
        filter: TaskFilter,
    },
    SetSortBy {
        sort_by: SortKey,
    },
    ClearCompletedTasks,
    SetLoading {
        is_loading: bool,
    },
    SetError {
        error: Option<String>,
    },
    ClearTaskError,

    // quotes
    RefreshDailyQuote,
    RefreshDailyQuoteIfStale,
    AddToFavorites {
        quote: Quote,
    },
    RemoveFromFavorites {
        quote: Quote,
    },
    ClearQuoteError,
}

impl Action {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Action::StartSession { .. } => "start_session",
            Action::PauseSession => "pause_session",
            Action::ResumeSession => "resume_session",
            Action::StopSession { .. } => "stop_session",
            Action::UpdateTimeRemaining { .. } => "update_time_remaining",
            Action::StartBreak => "start_break",
            Action::UpdateBreakTimeRemaining { .. } => "update_break_time_remaining",
            Action::EndBreak => "end_break",
            Action::UpdateSettings { .. } => "update_settings",
            Action::ResetSessionCount => "reset_session_count",
            Action::AddSessionNote { .. } => "add_session_note",
            Action::DeleteSession { .. } => "delete_session",
            Action::AddTask { .. } => "add_task",
            Action::UpdateTask { .. } => "update_task",
            Action::DeleteTask { .. } => "delete_task",
            Action::ToggleTaskComplete { .. } => "toggle_task_complete",
            Action::SetFilter { .. } => "set_filter",
            Action::SetSortBy { .. } => "set_sort_by",
            Action::ClearCompletedTasks => "clear_completed_tasks",
            Action::SetLoading { .. } => "set_loading",
            Action::SetError { .. } => "set_error",
            Action::ClearTaskError => "clear_task_error",
            Action::RefreshDailyQuote => "refresh_daily_quote",
            Action::RefreshDailyQuoteIfStale => "refresh_daily_quote_if_stale",
            Action::AddToFavorites { .. } => "add_to_favorites",
            Action::RemoveFromFavorites { .. } => "remove_from_favorites",
            Action::ClearQuoteError => "clear_quote_error",
        }
    }
}

/// Owner of the current snapshot and the collaborators commands need.
pub struct Store {
    state: Arc<AppState>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    rng: Box<dyn RngCore + Send>,
    quote_pool: Arc<[Quote]>,
}

impl Store {
    /// Store backed by the system clock, UUID ids and the built-in quotes.
    pub fn new(state: AppState) -> Self {
        Self {
            state: Arc::new(state),
            clock: Arc::new(SystemClock),
            ids: Arc::new(UuidGenerator),
            rng: Box::new(StdRng::from_entropy()),
            quote_pool: builtin_quotes().into(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_ids(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn with_rng(mut self, rng: impl RngCore + Send + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    pub fn with_quote_pool(mut self, pool: Vec<Quote>) -> Self {
        self.quote_pool = pool.into();
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// The current snapshot. Cheap to clone and never mutated afterwards.
    pub fn snapshot(&self) -> Arc<AppState> {
        Arc::clone(&self.state)
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn quote_pool(&self) -> &[Quote] {
        &self.quote_pool
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Apply `action` and return the resulting snapshot.
    pub fn dispatch(&mut self, action: Action) -> Arc<AppState> {
        tracing::debug!(action = action.name(), "dispatch");
        let now = self.clock.now();
        let state = Arc::make_mut(&mut self.state);

        match action {
            Action::StartSession {
                duration,
                session_type,
                task_id,
            } => {
                let id = self.ids.generate_id();
                state
                    .focus
                    .start_session(id, duration, session_type, task_id, now);
            }
            Action::PauseSession => state.focus.pause_session(),
            Action::ResumeSession => state.focus.resume_session(),
            Action::StopSession { completed, notes } => {
                state.focus.stop_session(completed, notes, now);
            }
            Action::UpdateTimeRemaining { seconds } => state.focus.update_time_remaining(seconds),
            Action::StartBreak => state.focus.start_break(),
            Action::UpdateBreakTimeRemaining { seconds } => {
                state.focus.update_break_time_remaining(seconds)
            }
            Action::EndBreak => state.focus.end_break(),
            Action::UpdateSettings { patch } => state.focus.update_settings(&patch),
            Action::ResetSessionCount => state.focus.reset_session_count(),
            Action::AddSessionNote { session_id, notes } => {
                state.focus.add_session_note(&session_id, notes)
            }
            Action::DeleteSession { session_id } => state.focus.delete_session(&session_id),

            Action::AddTask { task } => {
                let id = self.ids.generate_id();
                if let Err(err) = state.tasks.add_task(task, id, now) {
                    tracing::debug!(%err, "add_task rejected");
                }
            }
            Action::UpdateTask { id, patch } => {
                if let Err(err) = state.tasks.update_task(&id, patch, now) {
                    tracing::debug!(%err, task_id = %id, "update_task rejected");
                }
            }
            Action::DeleteTask { id } => {
                state.tasks.delete_task(&id);
            }
            Action::ToggleTaskComplete { id } => {
                state.tasks.toggle_task_complete(&id, now);
            }
            Action::SetFilter { filter } => state.tasks.set_filter(filter),
            Action::SetSortBy { sort_by } => state.tasks.set_sort_by(sort_by),
            Action::ClearCompletedTasks => {
                state.tasks.clear_completed_tasks();
            }
            Action::SetLoading { is_loading } => state.tasks.set_loading(is_loading),
            Action::SetError { error } => state.tasks.set_error(error),
            Action::ClearTaskError => state.tasks.clear_error(),

            Action::RefreshDailyQuote => {
                state
                    .quotes
                    .refresh_daily_quote(&self.quote_pool, &mut self.rng, now)
            }
            Action::RefreshDailyQuoteIfStale => {
                state
                    .quotes
                    .refresh_if_stale(&self.quote_pool, &mut self.rng, now);
            }
            Action::AddToFavorites { quote } => state.quotes.add_to_favorites(quote),
            Action::RemoveFromFavorites { quote } => state.quotes.remove_from_favorites(&quote),
            Action::ClearQuoteError => state.quotes.clear_error(),
        }

        self.snapshot()
    }

    /// Host tick: advance whichever countdown is running by `elapsed_secs`.
    ///
    /// The session countdown moves only while a session is active and not
    /// paused; the break countdown moves whenever the break overlay is on.
    pub fn tick(&mut self, elapsed_secs: u64) -> Arc<AppState> {
        let elapsed = i64::try_from(elapsed_secs).unwrap_or(i64::MAX);
        let focus = &self.state.focus;
        let session_running = focus.is_active() && !focus.is_paused();
        let session_left = focus.time_remaining() as i64;
        let break_running = focus.is_break();
        let break_left = focus.break_time_remaining() as i64;

        if session_running {
            self.dispatch(Action::UpdateTimeRemaining {
                seconds: session_left.saturating_sub(elapsed),
            });
        }
        if break_running {
            self.dispatch(Action::UpdateBreakTimeRemaining {
                seconds: break_left.saturating_sub(elapsed),
            });
        }
        self.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{ManualClock, SequentialIds};
    use chrono::{Duration, TimeZone};

    fn store() -> (Store, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 7, 1, 9, 0, 0).unwrap(),
        ));
        let store = Store::new(AppState::default())
            .with_clock(clock.clone())
            .with_ids(Arc::new(SequentialIds::new("id")))
            .with_rng(StdRng::seed_from_u64(42));
        (store, clock)
    }

    #[test]
    fn dispatch_is_copy_on_write() {
        let (mut store, _) = store();
        let before = store.snapshot();
        let after = store.dispatch(Action::AddTask {
            task: NewTask::new("Buy milk"),
        });
        assert!(before.tasks.tasks().is_empty());
        assert_eq!(after.tasks.tasks().len(), 1);
        assert!(!Arc::ptr_eq(&before, &after));
    }

    #[test]
    fn session_round_trip_through_actions() {
        let (mut store, clock) = store();
        store.dispatch(Action::StartSession {
            duration: Some(25),
            session_type: Some(SessionType::Pomodoro),
            task_id: None,
        });
        clock.advance(Duration::minutes(25));
        let state = store.dispatch(Action::StopSession {
            completed: true,
            notes: None,
        });

        let session = &state.focus.sessions()[0];
        assert_eq!(session.id, "id-1");
        assert_eq!(session.actual_duration, Some(25));
        assert_eq!(state.focus.session_count(), 1);
        assert_eq!(state.focus.stats().total_focus_time, 25);
    }

    #[test]
    fn tick_counts_down_only_when_running() {
        let (mut store, _) = store();
        store.dispatch(Action::StartSession {
            duration: Some(1),
            session_type: None,
            task_id: None,
        });
        let state = store.tick(20);
        assert_eq!(state.focus.time_remaining(), 40);

        store.dispatch(Action::PauseSession);
        let state = store.tick(20);
        assert_eq!(state.focus.time_remaining(), 40);

        store.dispatch(Action::ResumeSession);
        let state = store.tick(100);
        assert_eq!(state.focus.time_remaining(), 0);
    }

    #[test]
    fn tick_counts_down_break() {
        let (mut store, _) = store();
        store.dispatch(Action::StartBreak);
        let state = store.tick(60);
        assert_eq!(state.focus.break_time_remaining(), 14 * 60);
    }

    #[test]
    fn rejected_task_surfaces_in_error_slot() {
        let (mut store, _) = store();
        let state = store.dispatch(Action::AddTask {
            task: NewTask::new(""),
        });
        assert!(state.tasks.tasks().is_empty());
        assert_eq!(state.tasks.error(), Some("title is required"));
    }

    #[test]
    fn empty_quote_pool_is_reported_as_state() {
        let (store, _) = store();
        let mut store = store.with_quote_pool(Vec::new());
        let state = store.dispatch(Action::RefreshDailyQuote);
        assert_eq!(state.quotes.error(), Some("Failed to refresh quote"));
        assert!(!state.quotes.is_loading());
    }

    #[test]
    fn actions_serialize_with_type_tag() {
        let json = serde_json::to_value(Action::ToggleTaskComplete { id: "t-1".into() }).unwrap();
        assert_eq!(json["type"], "toggle_task_complete");
        let back: Action = serde_json::from_value(json).unwrap();
        assert_eq!(back, Action::ToggleTaskComplete { id: "t-1".into() });
    }

    #[test]
    fn rehydrated_recomputes_stats() {
        let (mut store, _) = store();
        store.dispatch(Action::StartSession {
            duration: None,
            session_type: None,
            task_id: None,
        });
        store.dispatch(Action::StopSession {
            completed: true,
            notes: None,
        });
        let mut json = serde_json::to_value(store.state()).unwrap();
        json["focus"]["stats"]["total_sessions"] = serde_json::json!(99);
        let loaded: AppState = serde_json::from_value(json).unwrap();
        assert_eq!(loaded.rehydrated().focus.stats().total_sessions, 1);
    }
}
