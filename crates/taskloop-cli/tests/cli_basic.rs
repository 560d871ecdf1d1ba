//! Basic CLI E2E tests.
//!
//! Each test runs the compiled binary against its own temporary data
//! directory, so nothing leaks between tests or into the real config.

use std::path::Path;
use std::process::Command;

use chrono::NaiveDate;
use taskloop_core::{Database, StreakRecord, TaskStore};
use tempfile::TempDir;

/// Invoke the CLI and return (stdout, stderr, exit code).
fn run_cli(dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_taskloop-cli"))
        .env("TASKLOOP_DATA_DIR", dir)
        .args(args)
        .output()
        .expect("failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

/// Invoke the CLI and expect success.
fn run_cli_success(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(dir, args);
    assert_eq!(code, 0, "CLI command failed: {args:?}\nstderr: {stderr}");
    stdout
}

/// Invoke the CLI and expect failure.
fn run_cli_failure(dir: &Path, args: &[&str]) -> (String, String, i32) {
    let (stdout, stderr, code) = run_cli(dir, args);
    assert!(code != 0, "CLI command unexpectedly succeeded: {args:?}");
    (stdout, stderr, code)
}

/// Parse the JSON document that follows any human-readable lines.
fn parse_json(output: &str) -> serde_json::Value {
    let start = output
        .find(['{', '['])
        .expect("no JSON found in CLI output");
    serde_json::from_str(&output[start..]).expect("failed to parse JSON output")
}

#[test]
fn test_task_lifecycle() {
    let dir = TempDir::new().unwrap();

    let out = run_cli_success(dir.path(), &["task", "add", "Morning stretch"]);
    assert!(out.contains("Task created:"));
    let task = parse_json(&out);
    let id = task["id"].as_str().unwrap().to_string();
    assert_eq!(task["frequency"], "daily");

    let out = run_cli_success(dir.path(), &["task", "complete", &id, "--no-classifier"]);
    assert!(out.contains("Completed: Morning stretch (+10 points)"));
    assert!(out.contains("New badge earned: 👟 First Steps"));

    let out = run_cli_success(dir.path(), &["task", "complete", &id, "--no-classifier"]);
    assert!(out.contains("Already completed: Morning stretch"));

    let out = run_cli_success(dir.path(), &["badge", "list", "--earned"]);
    let badges = parse_json(&out);
    assert_eq!(badges.as_array().unwrap().len(), 1);
    assert_eq!(badges[0]["id"], "first-steps");

    let out = run_cli_success(dir.path(), &["stats", "show"]);
    let stats = parse_json(&out);
    assert_eq!(stats["points"], 10);
    assert_eq!(stats["completed_count"], 1);
    assert_eq!(stats["streak"]["current_streak"], 1);
    assert_eq!(stats["completion_percentage"], 100);
}

#[test]
fn test_pending_filter_and_delete() {
    let dir = TempDir::new().unwrap();

    let out = run_cli_success(dir.path(), &["task", "add", "Stretch"]);
    let first = parse_json(&out)["id"].as_str().unwrap().to_string();
    run_cli_success(dir.path(), &["task", "add", "Read"]);

    run_cli_success(dir.path(), &["task", "complete", &first, "--no-classifier"]);

    let out = run_cli_success(dir.path(), &["task", "list", "--pending"]);
    let pending = parse_json(&out);
    assert_eq!(pending.as_array().unwrap().len(), 1);
    assert_eq!(pending[0]["name"], "Read");

    let out = run_cli_success(dir.path(), &["task", "delete", &first]);
    assert!(out.contains("Task deleted:"));
    let out = run_cli_success(dir.path(), &["task", "delete", &first]);
    assert!(out.contains("Task not found:"));
}

#[test]
fn test_reminders_list_upcoming_fires() {
    let dir = TempDir::new().unwrap();
    run_cli_success(
        dir.path(),
        &["task", "add", "Stretch", "--reminder", "09:30"],
    );
    run_cli_success(dir.path(), &["task", "add", "Read"]);

    let out = run_cli_success(dir.path(), &["task", "reminders", "--count", "2"]);
    let line = out
        .lines()
        .find(|l| l.starts_with("Stretch: "))
        .expect("no reminder line for Stretch");
    assert_eq!(line.matches("09:30").count(), 2);
    assert!(!out.contains("Read:"));
}

#[test]
fn test_completing_unknown_task_fails() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, _) =
        run_cli_failure(dir.path(), &["task", "complete", "nope", "--no-classifier"]);
    assert!(stderr.contains("Unknown task"));
}

#[test]
fn test_invalid_frequency_fails() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, _) = run_cli_failure(
        dir.path(),
        &["task", "add", "Stretch", "--frequency", "fortnightly"],
    );
    assert!(stderr.contains("Invalid frequency"));
}

#[test]
fn test_streak_checkin_starts_at_zero() {
    let dir = TempDir::new().unwrap();
    let out = run_cli_success(dir.path(), &["streak", "checkin"]);
    assert!(out.contains("Streak intact: 0 day(s)"));

    let out = run_cli_success(dir.path(), &["streak", "show"]);
    let streak = parse_json(&out);
    assert_eq!(streak["current_streak"], 0);
    assert!(streak["last_completed_date"].is_null());
}

#[test]
fn test_stats_show_resets_a_stale_streak() {
    let dir = TempDir::new().unwrap();

    let out = run_cli_success(dir.path(), &["task", "add", "Stretch"]);
    let id = parse_json(&out)["id"].as_str().unwrap().to_string();
    run_cli_success(dir.path(), &["task", "complete", &id, "--no-classifier"]);

    // rewind the stored chain to one that broke years ago
    let db = Database::open_at(dir.path().join("taskloop.db")).unwrap();
    db.set_streak(
        "default",
        &StreakRecord {
            current_streak: 3,
            longest_streak: 5,
            last_completed_date: Some(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()),
        },
    )
    .unwrap();
    drop(db);

    let stats = parse_json(&run_cli_success(dir.path(), &["stats", "show"]));
    assert_eq!(stats["streak"]["current_streak"], 0);
    assert_eq!(stats["streak"]["longest_streak"], 5);
    assert_eq!(stats["points"], 10);
}

#[test]
fn test_config_get_set_roundtrip() {
    let dir = TempDir::new().unwrap();

    let out = run_cli_success(dir.path(), &["config", "get", "points.per_completion"]);
    assert_eq!(out.trim(), "10");

    run_cli_success(dir.path(), &["config", "set", "points.per_completion", "25"]);
    let out = run_cli_success(dir.path(), &["config", "get", "points.per_completion"]);
    assert_eq!(out.trim(), "25");

    // the new rate applies to completions
    let out = run_cli_success(dir.path(), &["task", "add", "Stretch"]);
    let id = parse_json(&out)["id"].as_str().unwrap().to_string();
    let out = run_cli_success(dir.path(), &["task", "complete", &id, "--no-classifier"]);
    assert!(out.contains("(+25 points)"));

    let (_, stderr, _) = run_cli_failure(
        dir.path(),
        &["config", "set", "points.per_completion", "lots"],
    );
    assert!(stderr.contains("Invalid configuration value"));
}

#[test]
fn test_suggest_is_seed_stable() {
    let dir = TempDir::new().unwrap();
    let first = run_cli_success(dir.path(), &["suggest", "--seed", "42"]);
    let second = run_cli_success(dir.path(), &["suggest", "--seed", "42"]);
    assert_eq!(first, second);
    assert!(first.starts_with("Suggestion: "));
}

#[test]
fn test_suggest_add_creates_a_task() {
    let dir = TempDir::new().unwrap();
    let out = run_cli_success(dir.path(), &["suggest", "--add", "--seed", "7"]);
    assert!(out.contains("Task created:"));

    let out = run_cli_success(dir.path(), &["task", "list"]);
    let tasks = parse_json(&out);
    assert_eq!(tasks.as_array().unwrap().len(), 1);

    // the next suggestion avoids the task that was just added
    let added = tasks[0]["name"].as_str().unwrap();
    let repeat = run_cli_success(dir.path(), &["suggest", "--seed", "7"]);
    let suggested = repeat.trim().strip_prefix("Suggestion: ").unwrap();
    assert_ne!(suggested, added);
}

#[test]
fn test_profile_visibility_and_leaderboard() {
    let dir = TempDir::new().unwrap();

    let out = run_cli_success(dir.path(), &["profile", "show"]);
    let profile = parse_json(&out);
    assert_eq!(profile["username"], "default");
    assert_eq!(profile["public_profile"], false);

    let out = run_cli_success(dir.path(), &["profile", "leaderboard"]);
    assert_eq!(parse_json(&out).as_array().unwrap().len(), 0);

    run_cli_success(dir.path(), &["profile", "set-visibility", "public"]);
    let out = run_cli_success(dir.path(), &["profile", "leaderboard"]);
    assert_eq!(parse_json(&out).as_array().unwrap().len(), 1);

    let (_, stderr, _) =
        run_cli_failure(dir.path(), &["profile", "set-visibility", "sometimes"]);
    assert!(stderr.contains("expected 'public' or 'private'"));
}

#[test]
fn test_completions_mention_the_binary() {
    let dir = TempDir::new().unwrap();
    let out = run_cli_success(dir.path(), &["completions", "bash"]);
    assert!(out.contains("taskloop-cli"));
}
