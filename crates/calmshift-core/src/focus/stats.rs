use serde::{Deserialize, Serialize};

use super::session::FocusSession;

/// Aggregates over the finalized session history.
///
/// Always a pure function of the session list; see [`FocusStats::compute`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FocusStats {
    pub total_sessions: u64,
    /// Minutes.
    pub total_focus_time: i64,
    /// Minutes.
    pub average_session_length: f64,
    /// Percentage, 0..=100.
    pub completion_rate: f64,
    /// Consecutive days with sessions. Nothing in this crate computes it yet.
    pub streak: u32,
}

impl FocusStats {
    pub fn compute(sessions: &[FocusSession]) -> Self {
        let total_sessions = sessions.len() as u64;
        let total_focus_time: i64 = sessions
            .iter()
            .map(|s| s.actual_duration.unwrap_or(0))
            .sum();
        let completed = sessions.iter().filter(|s| s.completed).count();

        let (average_session_length, completion_rate) = if total_sessions > 0 {
            let n = total_sessions as f64;
            (total_focus_time as f64 / n, (completed as f64 / n) * 100.0)
        } else {
            (0.0, 0.0)
        };

        Self {
            total_sessions,
            total_focus_time,
            average_session_length,
            completion_rate,
            streak: 0,
        }
    }
}
