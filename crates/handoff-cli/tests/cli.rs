use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};

const MONDAY_10AM_UTC: &str = "2025-05-05T10:00:00Z";

fn handoff() -> Command {
    let mut cmd = Command::cargo_bin("handoff").unwrap();
    cmd.env_remove("RUST_LOG")
        .env_remove("HANDOFF_TIMEZONE")
        .env_remove("HANDOFF_RECENT_TASKS");
    cmd
}

/// Per-test temp file, removed when dropped.
struct Fixture(PathBuf);

impl Fixture {
    fn path(&self) -> &Path {
        &self.0
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

fn fixture(name: &str, contents: &str) -> Fixture {
    let path = std::env::temp_dir().join(format!("handoff-cli-{}-{name}", std::process::id()));
    std::fs::write(&path, contents).unwrap();
    Fixture(path)
}

const DONOR: &str = r#"{ "monday": { "available": true, "open": "7:00 AM", "close": "6:00 PM" } }"#;
const RECIPIENT: &str =
    r#"{ "name": "Eastside Pantry", "operatingHours": { "tuesday": { "available": true, "open": "9:00 AM" } } }"#;
const CLOSED: &str = r#"{ "monday": { "available": false, "close": "6:00 PM" }, "tuesday": { "available": false } }"#;

#[test]
fn test_help() {
    handoff()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_parse_time() {
    handoff()
        .args(["parse-time", "1:15 PM"])
        .assert()
        .success()
        .stdout("13:15\n");
}

#[test]
fn test_parse_time_malformed_is_midnight() {
    handoff()
        .args(["parse-time", "after lunch"])
        .assert()
        .success()
        .stdout("00:00\n");
}

#[test]
fn test_closing_from_stdin() {
    handoff()
        .args(["closing", "--schedule", "-", "--now", MONDAY_10AM_UTC, "--tz", "UTC"])
        .write_stdin(DONOR)
        .assert()
        .success()
        .stdout("5/5/2025, 06:00 PM\n");
}

#[test]
fn test_closing_in_local_timezone() {
    // 14:00 UTC is 10:00 EDT on Monday.
    handoff()
        .args([
            "closing",
            "--schedule",
            "-",
            "--now",
            "2025-05-05T14:00:00Z",
            "--tz",
            "America/New_York",
        ])
        .write_stdin(DONOR)
        .assert()
        .success()
        .stdout("5/5/2025, 06:00 PM\n");
}

#[test]
fn test_closing_unavailable() {
    handoff()
        .args(["closing", "--schedule", "-", "--now", MONDAY_10AM_UTC])
        .write_stdin(CLOSED)
        .assert()
        .success()
        .stdout("Unavailable\n");
}

#[test]
fn test_opening_after_anchor() {
    handoff()
        .args([
            "opening",
            "--schedule",
            "-",
            "--anchor",
            "2025-05-05T18:00:00Z",
            "--now",
            MONDAY_10AM_UTC,
        ])
        .write_stdin(RECIPIENT)
        .assert()
        .success()
        .stdout("5/6/2025, 09:00 AM\n");
}

#[test]
fn test_window_text() {
    let donor = fixture("window-text-donor.json", DONOR);
    let recipient = fixture("window-text-recipient.json", RECIPIENT);
    handoff()
        .arg("window")
        .arg("--donor")
        .arg(donor.path())
        .arg("--recipient")
        .arg(recipient.path())
        .args(["--now", MONDAY_10AM_UTC, "--tz", "UTC"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Donor closing:     5/5/2025, 06:00 PM"))
        .stdout(predicate::str::contains("Recipient opening: 5/6/2025, 09:00 AM"));
}

#[test]
fn test_window_json() {
    let donor = fixture("window-json-donor.json", DONOR);
    let recipient = fixture("window-json-recipient.json", RECIPIENT);
    let output = handoff()
        .arg("window")
        .arg("--donor")
        .arg(donor.path())
        .arg("--recipient")
        .arg(recipient.path())
        .args(["--now", MONDAY_10AM_UTC, "--tz", "UTC", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["donorClosing"], "2025-05-05T18:00:00+00:00");
    assert_eq!(value["recipientOpening"], "2025-05-06T09:00:00+00:00");
    assert_eq!(value["actionable"], true);
    assert_eq!(value["display"]["donorClosing"], "5/5/2025, 06:00 PM");
}

#[test]
fn test_window_closed_donor_is_unavailable() {
    let donor = fixture("window-closed-donor.json", CLOSED);
    let recipient = fixture("window-closed-recipient.json", RECIPIENT);
    let output = handoff()
        .arg("window")
        .arg("--donor")
        .arg(donor.path())
        .arg("--recipient")
        .arg(recipient.path())
        .args(["--now", MONDAY_10AM_UTC, "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(value["donorClosing"].is_null());
    assert!(value["recipientOpening"].is_null());
    assert_eq!(value["actionable"], false);
    assert_eq!(value["display"]["donorClosing"], "Unavailable");
    assert_eq!(value["display"]["recipientOpening"], "Unavailable");
}

#[test]
fn test_window_rejects_stdin_for_both_sides() {
    handoff()
        .args(["window", "--donor", "-", "--recipient", "-", "--now", MONDAY_10AM_UTC])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Only one of --donor and --recipient can read from stdin",
        ));
}

#[test]
fn test_window_recipient_from_stdin() {
    let donor = fixture("window-stdin-donor.json", DONOR);
    handoff()
        .arg("window")
        .arg("--donor")
        .arg(donor.path())
        .args(["--recipient", "-", "--now", MONDAY_10AM_UTC])
        .write_stdin(RECIPIENT)
        .assert()
        .success()
        .stdout(predicate::str::contains("Recipient opening: 5/6/2025, 09:00 AM"));
}

fn accepted_tasks() -> String {
    let tasks: Vec<serde_json::Value> = [12, 9, 11, 10]
        .into_iter()
        .map(|hour| {
            serde_json::json!({
                "donorId": "bakery",
                "donorName": "Corner Bakery",
                "recipientId": format!("pantry-{hour}"),
                "recipientName": format!("Pantry {hour}"),
                "donorClosingTime": "5/5/2025, 06:00 PM",
                "recipientOpenTime": "5/6/2025, 09:00 AM",
                "timestamp": format!("2025-05-05T{hour:02}:00:00Z"),
            })
        })
        .collect();
    serde_json::to_string(&tasks).unwrap()
}

#[test]
fn test_recent_uses_default_limit() {
    let output = handoff()
        .args(["recent", "--tasks", "-", "--user", "bakery", "--json"])
        .write_stdin(accepted_tasks())
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<&str> = value
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["recipientName"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Pantry 10", "Pantry 11", "Pantry 12"]);
}

#[test]
fn test_recent_limit_from_config() {
    let config = fixture("recent-config.toml", "recent_task_limit = 1\n");
    handoff()
        .arg("--config")
        .arg(config.path())
        .args(["recent", "--tasks", "-", "--user", "bakery"])
        .write_stdin(accepted_tasks())
        .assert()
        .success()
        .stdout(
            "2025-05-05T12:00:00+00:00  Corner Bakery -> Pantry 12  \
             closes 5/5/2025, 06:00 PM, opens 5/6/2025, 09:00 AM\n",
        );
}

#[test]
fn test_recent_limit_from_env_and_flag() {
    let output = handoff()
        .env("HANDOFF_RECENT_TASKS", "2")
        .args(["recent", "--tasks", "-", "--user", "bakery", "--json"])
        .write_stdin(accepted_tasks())
        .output()
        .unwrap();
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 2);

    let output = handoff()
        .env("HANDOFF_RECENT_TASKS", "2")
        .args(["recent", "--tasks", "-", "--user", "bakery", "--limit", "4", "--json"])
        .write_stdin(accepted_tasks())
        .output()
        .unwrap();
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 4);
}

#[test]
fn test_recent_unknown_user() {
    handoff()
        .args(["recent", "--tasks", "-", "--user", "nobody"])
        .write_stdin(accepted_tasks())
        .assert()
        .success()
        .stdout("No accepted tasks for nobody\n");
}

#[test]
fn test_config_sets_timezone() {
    let config = fixture("config.toml", "timezone = \"America/New_York\"\n");
    handoff()
        .arg("--config")
        .arg(config.path())
        .args(["closing", "--schedule", "-", "--now", "2025-05-05T14:00:00Z"])
        .write_stdin(DONOR)
        .assert()
        .success()
        .stdout("5/5/2025, 06:00 PM\n");
}

#[test]
fn test_invalid_json_fails() {
    handoff()
        .args(["closing", "--schedule", "-", "--now", MONDAY_10AM_UTC])
        .write_stdin("{ monday: ")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not valid JSON"));
}

#[test]
fn test_invalid_timezone_fails() {
    handoff()
        .args(["closing", "--schedule", "-", "--tz", "Nowhere/Special"])
        .write_stdin(DONOR)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid timezone"));
}

#[test]
fn test_invalid_now_fails() {
    handoff()
        .args(["closing", "--schedule", "-", "--now", "monday morning"])
        .write_stdin(DONOR)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid datetime"));
}

#[test]
fn test_missing_schedule_file_fails() {
    handoff()
        .args(["closing", "--schedule", "/nonexistent/handoff-schedule.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read schedule file"));
}
