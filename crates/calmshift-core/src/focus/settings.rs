use serde::{Deserialize, Serialize};

/// User preferences for the focus timer.
///
/// Durations are in minutes. No range validation is applied; the host is
/// trusted to pass sensible values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusSettings {
    #[serde(default = "default_duration")]
    pub default_duration: u32,
    #[serde(default = "default_break_duration")]
    pub break_duration: u32,
    #[serde(default = "default_long_break_duration")]
    pub long_break_duration: u32,
    #[serde(default = "default_sessions_until_long_break")]
    pub sessions_until_long_break: u32,
    #[serde(default = "default_true")]
    pub sound_enabled: bool,
    #[serde(default = "default_true")]
    pub vibration_enabled: bool,
    #[serde(default)]
    pub auto_start_breaks: bool,
    #[serde(default)]
    pub auto_start_sessions: bool,
}

fn default_duration() -> u32 {
    25
}
fn default_break_duration() -> u32 {
    5
}
fn default_long_break_duration() -> u32 {
    15
}
fn default_sessions_until_long_break() -> u32 {
    4
}
fn default_true() -> bool {
    true
}

impl Default for FocusSettings {
    fn default() -> Self {
        Self {
            default_duration: default_duration(),
            break_duration: default_break_duration(),
            long_break_duration: default_long_break_duration(),
            sessions_until_long_break: default_sessions_until_long_break(),
            sound_enabled: true,
            vibration_enabled: true,
            auto_start_breaks: false,
            auto_start_sessions: false,
        }
    }
}

/// Partial update for [`FocusSettings`]. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusSettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_break_duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sessions_until_long_break: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vibration_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_start_breaks: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_start_sessions: Option<bool>,
}

impl FocusSettingsPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl FocusSettings {
    /// Shallow merge: every `Some` in the patch overwrites the field.
    pub fn merge(&mut self, patch: &FocusSettingsPatch) {
        if let Some(v) = patch.default_duration {
            self.default_duration = v;
        }
        if let Some(v) = patch.break_duration {
            self.break_duration = v;
        }
        if let Some(v) = patch.long_break_duration {
            self.long_break_duration = v;
        }
        if let Some(v) = patch.sessions_until_long_break {
            self.sessions_until_long_break = v;
        }
        if let Some(v) = patch.sound_enabled {
            self.sound_enabled = v;
        }
        if let Some(v) = patch.vibration_enabled {
            self.vibration_enabled = v;
        }
        if let Some(v) = patch.auto_start_breaks {
            self.auto_start_breaks = v;
        }
        if let Some(v) = patch.auto_start_sessions {
            self.auto_start_sessions = v;
        }
    }
}
