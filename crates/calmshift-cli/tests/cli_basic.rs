//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own data directory.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (code, stdout, stderr).
fn run_cli(data_dir: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_calmshift"))
        .args(args)
        .env("CALMSHIFT_DATA_DIR", data_dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

fn run_ok(data_dir: &Path, args: &[&str]) -> String {
    let (code, stdout, stderr) = run_cli(data_dir, args);
    assert_eq!(code, 0, "command {args:?} failed: {stderr}");
    stdout
}

fn json(stdout: &str) -> serde_json::Value {
    serde_json::from_str(stdout).expect("Failed to parse JSON output")
}

/// JSON that follows a one-line human message.
fn json_after_first_line(stdout: &str) -> serde_json::Value {
    let (_, rest) = stdout.split_once('\n').expect("expected a header line");
    json(rest)
}

#[test]
fn test_task_add_and_list() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_ok(dir.path(), &["task", "add", "Buy milk", "--priority", "low"]);
    assert!(out.starts_with("Task created:"));
    let task = json_after_first_line(&out);
    assert_eq!(task["title"], "Buy milk");
    assert_eq!(task["priority"], "low");

    let list = json(&run_ok(dir.path(), &["task", "list"]));
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[test]
fn test_task_add_blank_title_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["task", "add", "   "]);
    assert_ne!(code, 0);
    assert!(stderr.contains("title is required"));
}

#[test]
fn test_task_filter_and_toggle() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_ok(dir.path(), &["task", "add", "Stretch"]);
    let id = json_after_first_line(&out)["id"].as_str().unwrap().to_string();

    let completed = json(&run_ok(dir.path(), &["task", "filter", "completed"]));
    assert!(completed.as_array().unwrap().is_empty());

    let toggled = json(&run_ok(dir.path(), &["task", "toggle", &id[..8]]));
    assert_eq!(toggled["completed"], true);

    let completed = json(&run_ok(dir.path(), &["task", "list"]));
    assert_eq!(completed.as_array().unwrap().len(), 1);

    let stats = json(&run_ok(dir.path(), &["task", "stats"]));
    assert_eq!(stats["total"], 1);
    assert_eq!(stats["completed"], 1);
}

#[test]
fn test_task_overdue_stats() {
    let dir = tempfile::tempdir().unwrap();
    run_ok(dir.path(), &["task", "add", "Old bill", "--due", "2000-01-01"]);
    let stats = json(&run_ok(dir.path(), &["task", "stats"]));
    assert_eq!(stats["overdue"], 1);
}

#[test]
fn test_focus_start_stop() {
    let dir = tempfile::tempdir().unwrap();
    let status = json(&run_ok(dir.path(), &["focus", "start", "--duration", "25"]));
    assert_eq!(status["is_active"], true);
    assert_eq!(status["time_remaining"], 1500);

    let status = json(&run_ok(dir.path(), &["focus", "tick", "--seconds", "60"]));
    assert_eq!(status["time_remaining"], 1440);

    let session = json(&run_ok(dir.path(), &["focus", "stop", "--completed"]));
    assert_eq!(session["completed"], true);
    assert_eq!(session["interrupted"], false);
    assert_eq!(session["actual_duration"], 0);

    let status = json(&run_ok(dir.path(), &["focus", "status"]));
    assert_eq!(status["session_count"], 1);
    assert_eq!(status["stats"]["total_sessions"], 1);
}

#[test]
fn test_focus_stop_without_session_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["focus", "stop"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("no active focus session"));
}

#[test]
fn test_focus_first_break_is_long() {
    let dir = tempfile::tempdir().unwrap();
    let status = json(&run_ok(dir.path(), &["focus", "break-start"]));
    assert_eq!(status["is_break"], true);
    assert_eq!(status["break_time_remaining"], 900);
}

#[test]
fn test_config_seeds_first_run_settings() {
    let dir = tempfile::tempdir().unwrap();
    run_ok(dir.path(), &["config", "set", "focus.default_duration", "45"]);
    assert_eq!(
        run_ok(dir.path(), &["config", "get", "focus.default_duration"]).trim(),
        "45"
    );
    let status = json(&run_ok(dir.path(), &["focus", "start"]));
    assert_eq!(status["time_remaining"], 45 * 60);
}

#[test]
fn test_config_unknown_key_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli(dir.path(), &["config", "get", "nope"]);
    assert_ne!(code, 0);
}

#[test]
fn test_quote_today_and_favorite() {
    let dir = tempfile::tempdir().unwrap();
    let quote = json(&run_ok(dir.path(), &["quote", "today"]));
    assert!(quote["text"].is_string());

    let again = json(&run_ok(dir.path(), &["quote", "today"]));
    assert_eq!(quote, again);

    let favorites = json(&run_ok(dir.path(), &["quote", "favorite"]));
    assert_eq!(favorites.as_array().unwrap().len(), 1);
    let favorites = json(&run_ok(dir.path(), &["quote", "favorite"]));
    assert_eq!(favorites.as_array().unwrap().len(), 1);

    let favorites = json(&run_ok(dir.path(), &["quote", "unfavorite", "1"]));
    assert!(favorites.as_array().unwrap().is_empty());
}
