use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of focus block the user started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionType {
    #[default]
    Pomodoro,
    DeepWork,
    Custom,
}

impl SessionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionType::Pomodoro => "pomodoro",
            SessionType::DeepWork => "deep-work",
            SessionType::Custom => "custom",
        }
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pomodoro" => Ok(SessionType::Pomodoro),
            "deep-work" | "deep_work" | "deepwork" => Ok(SessionType::DeepWork),
            "custom" => Ok(SessionType::Custom),
            other => Err(format!("unknown session type: {other}")),
        }
    }
}

/// A single focus session, live or finalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusSession {
    pub id: String,
    /// Planned length in minutes.
    pub duration: u32,
    /// Measured length in minutes, set when the session stops.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_duration: Option<i64>,
    pub start_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    pub completed: bool,
    pub interrupted: bool,
    #[serde(rename = "type")]
    pub session_type: SessionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl FocusSession {
    pub(crate) fn begin(
        id: String,
        duration: u32,
        session_type: SessionType,
        task_id: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            duration,
            actual_duration: None,
            start_time: now,
            end_time: None,
            completed: false,
            interrupted: false,
            session_type,
            task_id,
            notes: None,
        }
    }

    /// Copy of this session closed at `end`.
    pub(crate) fn finish(&self, end: DateTime<Utc>, completed: bool, notes: Option<String>) -> Self {
        Self {
            end_time: Some(end),
            actual_duration: Some(round_minutes(end - self.start_time)),
            completed,
            interrupted: !completed,
            notes,
            ..self.clone()
        }
    }

    /// Planned length in seconds.
    pub fn duration_secs(&self) -> u64 {
        u64::from(self.duration).saturating_mul(60)
    }
}

/// Whole minutes in `elapsed`, halves rounded toward positive infinity.
pub fn round_minutes(elapsed: chrono::Duration) -> i64 {
    let minutes = elapsed.num_milliseconds() as f64 / 60_000.0;
    (minutes + 0.5).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn round_minutes_matches_half_up() {
        assert_eq!(round_minutes(Duration::seconds(0)), 0);
        assert_eq!(round_minutes(Duration::seconds(29)), 0);
        assert_eq!(round_minutes(Duration::seconds(30)), 1);
        assert_eq!(round_minutes(Duration::seconds(25 * 60 + 10)), 25);
        assert_eq!(round_minutes(Duration::seconds(-30)), 0);
        assert_eq!(round_minutes(Duration::seconds(-31)), -1);
    }

    #[test]
    fn finish_sets_outcome_flags() {
        let start = Utc.with_ymd_and_hms(2024, 5, 2, 8, 0, 0).unwrap();
        let live = FocusSession::begin("s-1".into(), 25, SessionType::Pomodoro, None, start);
        let done = live.finish(start + Duration::minutes(24), false, Some("phone".into()));

        assert_eq!(done.actual_duration, Some(24));
        assert!(done.interrupted);
        assert!(!done.completed);
        assert_eq!(done.notes.as_deref(), Some("phone"));
        assert_eq!(done.id, live.id);
    }

    #[test]
    fn session_type_uses_kebab_case() {
        let json = serde_json::to_string(&SessionType::DeepWork).unwrap();
        assert_eq!(json, "\"deep-work\"");
        assert_eq!("deep-work".parse::<SessionType>().unwrap(), SessionType::DeepWork);
        assert!("nap".parse::<SessionType>().is_err());
    }
}
