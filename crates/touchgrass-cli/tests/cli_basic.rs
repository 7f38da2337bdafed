//! Basic CLI E2E tests.
//!
//! Tests run the built binary against a throwaway data directory and verify
//! outputs.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(data_dir: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_touchgrass-cli"))
        .args(args)
        .env("TOUCHGRASS_DATA_DIR", data_dir)
        .env_remove("TOUCHGRASS_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

fn json(stdout: &str) -> serde_json::Value {
    serde_json::from_str(stdout).expect("stdout is not JSON")
}

#[test]
fn test_suggest_json_on_a_nice_morning() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(
        dir.path(),
        &[
            "suggest", "--temp", "72", "--condition", "sunny", "--at", "10:00", "--json",
        ],
    );
    assert_eq!(code, 0);
    let suggestion = json(&stdout);
    assert_eq!(suggestion["activity_id"], "touch-grass");
    assert_eq!(suggestion["rule"], "weather_opportunity");
    assert!(suggestion["reason"].as_str().unwrap().contains("72"));
}

#[test]
fn test_suggest_respects_time_budget() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(
        dir.path(),
        &["suggest", "--available-secs", "90", "--at", "10:00", "--json"],
    );
    assert_eq!(code, 0);
    let suggestion = json(&stdout);
    assert!(suggestion["duration_seconds"].as_u64().unwrap() <= 90);
}

#[test]
fn test_suggest_rain_stays_indoors() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(
        dir.path(),
        &["suggest", "--temp", "45", "--condition", "rainy", "--json"],
    );
    assert_eq!(code, 0);
    assert_eq!(json(&stdout)["is_indoor"], true);
}

#[test]
fn test_suggest_human_output() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["suggest", "--since-break-min", "140"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("sitting for 2h 20m"));
}

#[test]
fn test_suggest_bad_condition_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli(
        dir.path(),
        &["suggest", "--temp", "60", "--condition", "hail"],
    );
    assert_ne!(code, 0);
}

#[test]
fn test_activity_log_and_today() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["activity", "log", "neck-rolls", "--at", "00:01"]);
    assert_eq!(code, 0);
    let event = json(&stdout);
    assert_eq!(event["type"], "ActivityRecorded");
    assert_eq!(event["category"], "stretch");

    let (code, stdout, _) = run_cli(dir.path(), &["activity", "today", "--json"]);
    assert_eq!(code, 0);
    let today = json(&stdout);
    assert_eq!(today.as_array().unwrap().len(), 1);
    assert_eq!(today[0]["activity_id"], "neck-rolls");

    let (code, stdout, _) = run_cli(dir.path(), &["activity", "streak"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "1 day");
}

#[test]
fn test_activity_log_unknown_id() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["activity", "log", "juggling"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error: Unknown activity: juggling"));
}

#[test]
fn test_activity_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["activity", "catalog"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("touch-grass"));
    assert!(stdout.contains("deep-breathing"));
}

#[test]
fn test_water_log_and_status() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["water", "log", "--at", "00:01"]);
    assert_eq!(code, 0);
    assert_eq!(json(&stdout)["total_today"], 1);

    let (code, stdout, _) = run_cli(dir.path(), &["water", "log", "2", "--at", "00:02"]);
    assert_eq!(code, 0);
    assert_eq!(json(&stdout)["total_today"], 3);

    let (code, stdout, _) = run_cli(dir.path(), &["water", "status", "--json"]);
    assert_eq!(code, 0);
    let status = json(&stdout);
    assert_eq!(status["total_today"], 3);
    assert_eq!(status["daily_goal"], 8);
}

#[test]
fn test_reminder_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["reminder", "status"]);
    assert_eq!(code, 0);
    assert_eq!(json(&stdout)["state"], "idle");

    let (code, _, _) = run_cli(dir.path(), &["config", "set", "reminders.respect_working_hours", "false"]);
    assert_eq!(code, 0);

    let (code, stdout, _) = run_cli(dir.path(), &["reminder", "start"]);
    assert_eq!(code, 0);
    assert_eq!(json(&stdout)["type"], "ReminderArmed");

    let (code, stdout, _) = run_cli(dir.path(), &["reminder", "pause"]);
    assert_eq!(code, 0);
    assert_eq!(json(&stdout)["type"], "ReminderPaused");

    let (code, stdout, _) = run_cli(dir.path(), &["reminder", "resume"]);
    assert_eq!(code, 0);
    assert_eq!(json(&stdout)["type"], "ReminderResumed");

    let (code, stdout, _) = run_cli(dir.path(), &["reminder", "cancel"]);
    assert_eq!(code, 0);
    assert_eq!(json(&stdout)["type"], "ReminderCancelled");

    let (_, stdout, _) = run_cli(dir.path(), &["reminder", "tick"]);
    assert_eq!(json(&stdout)["state"], "idle");
}

#[test]
fn test_config_get_set_reset() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["config", "get", "water.daily_goal"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "8");

    let (code, _, _) = run_cli(dir.path(), &["config", "set", "water.daily_goal", "10"]);
    assert_eq!(code, 0);
    let (_, stdout, _) = run_cli(dir.path(), &["config", "get", "water.daily_goal"]);
    assert_eq!(stdout.trim(), "10");

    let (code, _, stderr) = run_cli(dir.path(), &["config", "set", "water.daily_goal", "lots"]);
    assert_eq!(code, 1);
    assert!(stderr.starts_with("error:"));

    let (code, _, _) = run_cli(dir.path(), &["config", "get", "water.colour"]);
    assert_eq!(code, 1);

    let (code, _, _) = run_cli(dir.path(), &["config", "reset"]);
    assert_eq!(code, 0);
    let (_, stdout, _) = run_cli(dir.path(), &["config", "list"]);
    assert_eq!(json(&stdout)["water"]["daily_goal"], 8);
}

#[test]
fn test_reminder_status_does_not_fire() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli(dir.path(), &["config", "set", "reminders.respect_working_hours", "false"]);
    assert_eq!(code, 0);

    let (code, stdout, _) = run_cli(dir.path(), &["reminder", "start", "--at", "00:01"]);
    assert_eq!(code, 0);
    let due_at = json(&stdout)["due_at"].clone();

    // Well past the deadline: status only reports.
    let (code, stdout, _) = run_cli(dir.path(), &["reminder", "status", "--at", "23:59"]);
    assert_eq!(code, 0);
    let status = json(&stdout);
    assert_eq!(status["state"], "armed");
    assert_eq!(status["next_due"], due_at);

    let (code, stdout, _) = run_cli(dir.path(), &["reminder", "tick", "--at", "23:59"]);
    assert_eq!(code, 0);
    let fired = json(&stdout);
    assert_eq!(fired["type"], "ReminderDue");
    assert_eq!(fired["at"], due_at);
}
