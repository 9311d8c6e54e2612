use clap::Subcommand;
use calmshift_core::{Action, AppState, FocusSettingsPatch, SessionType};
use serde::Serialize;

use crate::app::{print_json, resolve_id, App, CliResult};

#[derive(Subcommand)]
pub enum FocusAction {
    /// Start a focus session
    Start {
        /// Planned minutes (default: focus.default_duration)
        #[arg(long)]
        duration: Option<u32>,
        /// pomodoro, deep-work or custom
        #[arg(long = "type")]
        session_type: Option<SessionType>,
        /// Task this session works on
        #[arg(long)]
        task: Option<String>,
    },
    /// Pause the running session
    Pause,
    /// Resume a paused session
    Resume,
    /// Stop the current session and record it
    Stop {
        /// Record as completed (otherwise interrupted)
        #[arg(long)]
        completed: bool,
        /// Notes to attach
        #[arg(long)]
        notes: Option<String>,
    },
    /// Advance running countdowns
    Tick {
        /// Seconds elapsed since the previous tick
        #[arg(long, default_value = "1")]
        seconds: u64,
    },
    /// Print timer state as JSON
    Status,
    /// Start a break (long break on every Nth completed session)
    BreakStart,
    /// End the current break
    BreakEnd,
    /// Attach notes to a recorded session
    Note {
        /// Session ID or unique prefix
        session_id: String,
        notes: String,
    },
    /// Delete a recorded session
    Delete {
        /// Session ID or unique prefix
        session_id: String,
    },
    /// Show or update timer settings
    Settings {
        #[arg(long)]
        default_duration: Option<u32>,
        #[arg(long)]
        break_duration: Option<u32>,
        #[arg(long)]
        long_break_duration: Option<u32>,
        #[arg(long)]
        sessions_until_long_break: Option<u32>,
        #[arg(long)]
        sound: Option<bool>,
        #[arg(long)]
        vibration: Option<bool>,
        #[arg(long)]
        auto_start_breaks: Option<bool>,
        #[arg(long)]
        auto_start_sessions: Option<bool>,
    },
    /// Reset the completed-session counter (new day)
    ResetCount,
    /// List recorded sessions
    Sessions {
        /// Only sessions started today
        #[arg(long)]
        today: bool,
    },
}

#[derive(Serialize)]
struct Status<'a> {
    current_session: Option<&'a calmshift_core::FocusSession>,
    is_active: bool,
    is_paused: bool,
    time_remaining: u64,
    session_count: u32,
    is_break: bool,
    break_time_remaining: u64,
    next_break_is_long: bool,
    stats: &'a calmshift_core::FocusStats,
}

fn status(state: &AppState) -> Status<'_> {
    let focus = &state.focus;
    Status {
        current_session: focus.current_session(),
        is_active: focus.is_active(),
        is_paused: focus.is_paused(),
        time_remaining: focus.time_remaining(),
        session_count: focus.session_count(),
        is_break: focus.is_break(),
        break_time_remaining: focus.break_time_remaining(),
        next_break_is_long: focus.next_break_is_long(),
        stats: focus.stats(),
    }
}

fn session_id(app: &App, wanted: &str) -> CliResult<String> {
    let ids = app.state().focus.sessions().iter().map(|s| s.id.as_str());
    resolve_id(ids, wanted, "session")
}

pub fn run(action: FocusAction) -> CliResult {
    let mut app = App::open()?;

    match action {
        FocusAction::Start {
            duration,
            session_type,
            task,
        } => {
            let task_id = match task {
                Some(wanted) => {
                    let ids = app.state().tasks.tasks().iter().map(|t| t.id.as_str());
                    Some(resolve_id(ids, &wanted, "task")?)
                }
                None => None,
            };
            let state = app.dispatch(Action::StartSession {
                duration,
                session_type,
                task_id,
            });
            print_json(&status(&state))?;
        }
        FocusAction::Pause => {
            let state = app.dispatch(Action::PauseSession);
            print_json(&status(&state))?;
        }
        FocusAction::Resume => {
            let state = app.dispatch(Action::ResumeSession);
            print_json(&status(&state))?;
        }
        FocusAction::Stop { completed, notes } => {
            if app.state().focus.current_session().is_none() {
                return Err("no active focus session".into());
            }
            let state = app.dispatch(Action::StopSession { completed, notes });
            print_json(&state.focus.sessions().last())?;
        }
        FocusAction::Tick { seconds } => {
            let state = app.tick(seconds);
            print_json(&status(&state))?;
        }
        FocusAction::Status => {
            print_json(&status(app.state()))?;
            return Ok(());
        }
        FocusAction::BreakStart => {
            let state = app.dispatch(Action::StartBreak);
            print_json(&status(&state))?;
        }
        FocusAction::BreakEnd => {
            let state = app.dispatch(Action::EndBreak);
            print_json(&status(&state))?;
        }
        FocusAction::Note { session_id: wanted, notes } => {
            let session_id = session_id(&app, &wanted)?;
            let state = app.dispatch(Action::AddSessionNote {
                session_id: session_id.clone(),
                notes,
            });
            print_json(&state.focus.session_by_id(&session_id))?;
        }
        FocusAction::Delete { session_id: wanted } => {
            let session_id = session_id(&app, &wanted)?;
            let state = app.dispatch(Action::DeleteSession {
                session_id: session_id.clone(),
            });
            println!("Session deleted: {session_id}");
            print_json(state.focus.stats())?;
        }
        FocusAction::Settings {
            default_duration,
            break_duration,
            long_break_duration,
            sessions_until_long_break,
            sound,
            vibration,
            auto_start_breaks,
            auto_start_sessions,
        } => {
            let patch = FocusSettingsPatch {
                default_duration,
                break_duration,
                long_break_duration,
                sessions_until_long_break,
                sound_enabled: sound,
                vibration_enabled: vibration,
                auto_start_breaks,
                auto_start_sessions,
            };
            if patch.is_empty() {
                print_json(app.state().focus.settings())?;
                return Ok(());
            }
            let state = app.dispatch(Action::UpdateSettings { patch });
            print_json(state.focus.settings())?;
        }
        FocusAction::ResetCount => {
            let state = app.dispatch(Action::ResetSessionCount);
            print_json(&status(&state))?;
        }
        FocusAction::Sessions { today } => {
            let focus = &app.state().focus;
            if today {
                print_json(&focus.todays_sessions(app.store().now()))?;
            } else {
                print_json(focus.sessions())?;
            }
            return Ok(());
        }
    }

    app.save()
}
