//! Focus session slice: timer lifecycle, break overlay and derived stats.

mod session;
mod settings;
mod state;
mod stats;

pub use session::{round_minutes, FocusSession, SessionType};
pub use settings::{FocusSettings, FocusSettingsPatch};
pub use state::FocusState;
pub use stats::FocusStats;
