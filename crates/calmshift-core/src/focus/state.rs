//! Focus session state machine.
//!
//! Wall-clock based and tick-free: the host decides when time passes and
//! reports it through [`FocusState::update_time_remaining`] and
//! [`FocusState::update_break_time_remaining`].
//!
//! ## State Transitions
//!
//! ```text
//! Idle --start--> Active <--pause/resume--> Active+Paused
//!   ^                |                          |
//!   +------stop------+--------------------------+
//! ```
//!
//! The break flag is an overlay and may be set while idle or active.

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::session::{FocusSession, SessionType};
use super::settings::{FocusSettings, FocusSettingsPatch};
use super::stats::FocusStats;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusState {
    current_session: Option<FocusSession>,
    sessions: Vec<FocusSession>,
    settings: FocusSettings,
    is_active: bool,
    is_paused: bool,
    /// Seconds left in the current session.
    time_remaining: u64,
    /// Completed sessions since the last reset.
    session_count: u32,
    is_break: bool,
    /// Seconds left in the current break.
    break_time_remaining: u64,
    stats: FocusStats,
}

impl Default for FocusState {
    fn default() -> Self {
        Self::with_settings(FocusSettings::default())
    }
}

impl FocusState {
    pub fn with_settings(settings: FocusSettings) -> Self {
        Self {
            current_session: None,
            sessions: Vec::new(),
            settings,
            is_active: false,
            is_paused: false,
            time_remaining: 0,
            session_count: 0,
            is_break: false,
            break_time_remaining: 0,
            stats: FocusStats::default(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn current_session(&self) -> Option<&FocusSession> {
        self.current_session.as_ref()
    }

    pub fn sessions(&self) -> &[FocusSession] {
        &self.sessions
    }

    pub fn settings(&self) -> &FocusSettings {
        &self.settings
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    pub fn time_remaining(&self) -> u64 {
        self.time_remaining
    }

    pub fn session_count(&self) -> u32 {
        self.session_count
    }

    pub fn is_break(&self) -> bool {
        self.is_break
    }

    pub fn break_time_remaining(&self) -> u64 {
        self.break_time_remaining
    }

    pub fn stats(&self) -> &FocusStats {
        &self.stats
    }

    pub fn session_by_id(&self, session_id: &str) -> Option<&FocusSession> {
        self.sessions.iter().find(|s| s.id == session_id)
    }

    /// Finalized sessions whose start falls on `day` in local time.
    pub fn sessions_on(&self, day: NaiveDate) -> Vec<&FocusSession> {
        self.sessions
            .iter()
            .filter(|s| s.start_time.with_timezone(&Local).date_naive() == day)
            .collect()
    }

    pub fn todays_sessions(&self, now: DateTime<Utc>) -> Vec<&FocusSession> {
        self.sessions_on(now.with_timezone(&Local).date_naive())
    }

    /// Whether the next `start_break` would pick the long break.
    ///
    /// `session_count == 0` counts as a long-break boundary. A zero
    /// `sessions_until_long_break` never does.
    pub fn next_break_is_long(&self) -> bool {
        self.session_count
            .checked_rem(self.settings.sessions_until_long_break)
            == Some(0)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a new session. Replaces any current session without saving it.
    pub fn start_session(
        &mut self,
        id: String,
        duration: Option<u32>,
        session_type: Option<SessionType>,
        task_id: Option<String>,
        now: DateTime<Utc>,
    ) {
        let duration = duration.unwrap_or(self.settings.default_duration);
        let session_type = session_type.unwrap_or_default();

        if let Some(previous) = &self.current_session {
            tracing::warn!(
                session_id = %previous.id,
                "starting a new focus session over an unfinished one"
            );
        }

        let session = FocusSession::begin(id, duration, session_type, task_id, now);
        self.time_remaining = session.duration_secs();
        self.current_session = Some(session);
        self.is_active = true;
        self.is_paused = false;
        self.is_break = false;
    }

    pub fn pause_session(&mut self) {
        self.is_paused = true;
    }

    pub fn resume_session(&mut self) {
        self.is_paused = false;
    }

    /// Finalize the current session into history. No-op when idle.
    ///
    /// Returns the finalized session.
    pub fn stop_session(
        &mut self,
        completed: bool,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> Option<&FocusSession> {
        let current = self.current_session.take()?;
        let finished = current.finish(now, completed, notes);

        self.sessions.push(finished);
        self.is_active = false;
        self.is_paused = false;
        self.time_remaining = 0;

        if completed {
            self.session_count = self.session_count.saturating_add(1);
        }
        self.recompute_stats();
        self.sessions.last()
    }

    pub fn update_time_remaining(&mut self, seconds: i64) {
        self.time_remaining = seconds.max(0) as u64;
    }

    pub fn start_break(&mut self) {
        let minutes = if self.next_break_is_long() {
            self.settings.long_break_duration
        } else {
            self.settings.break_duration
        };
        self.is_break = true;
        self.break_time_remaining = u64::from(minutes).saturating_mul(60);
    }

    pub fn update_break_time_remaining(&mut self, seconds: i64) {
        self.break_time_remaining = seconds.max(0) as u64;
    }

    pub fn end_break(&mut self) {
        self.is_break = false;
        self.break_time_remaining = 0;
    }

    pub fn update_settings(&mut self, patch: &FocusSettingsPatch) {
        self.settings.merge(patch);
    }

    pub fn reset_session_count(&mut self) {
        self.session_count = 0;
    }

    /// Set notes on a finalized session. Unknown ids are ignored.
    pub fn add_session_note(&mut self, session_id: &str, notes: String) {
        if let Some(session) = self.sessions.iter_mut().find(|s| s.id == session_id) {
            session.notes = Some(notes);
        }
    }

    pub fn delete_session(&mut self, session_id: &str) {
        self.sessions.retain(|s| s.id != session_id);
        self.recompute_stats();
    }

    /// Rebuild `stats` from `sessions`. Called after every history change
    /// and after loading a persisted snapshot.
    pub fn recompute_stats(&mut self) {
        self.stats = FocusStats::compute(&self.sessions);
    }
}
