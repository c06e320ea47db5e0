//! Integration tests for the `rota` CLI binary.
//!
//! Argument parsing, offline window computation, config management, and
//! event listing against a wiremock backend.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `rota` binary with env isolation.
///
/// Clears `ROTA_*` overrides and points config and state directories at
/// `home` so tests never touch the user's real configuration.
fn rota_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("rota");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"))
        .env("ROTA_CONFIG_PATH", home.join("config.toml"))
        .env("ROTA_CACHE__PERSIST", "false")
        .env("NO_COLOR", "1")
        .env_remove("ROTA_SERVER")
        .env_remove("ROTA_OUTPUT")
        .env_remove("ROTA_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn backend_events() -> serde_json::Value {
    json!([
        {
            "id": "leave-12",
            "title": "Ada Martin - Congé",
            "start": "2024-03-11T00:00:00.000Z",
            "end": "2024-03-15T23:59:59.999Z",
            "allDay": true,
            "type": "LEAVE",
            "userId": 5,
            "user": { "id": 5, "prenom": "Ada", "nom": "Martin", "role": "MAR" },
            "leaveType": "ANNUAL",
            "status": "APPROVED"
        },
        {
            "id": 31,
            "title": "Garde de nuit",
            "start": "2024-03-12T20:00:00.000Z",
            "end": "2024-03-13T08:00:00.000Z",
            "type": "DUTY",
            "userId": 7,
            "user": { "id": 7, "prenom": "Grace", "nom": "Hopper", "role": "IADE" },
            "locationId": 3,
            "locationName": "Bloc Sud"
        }
    ])
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = tempfile::tempdir().unwrap();
    let output = rota_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_lists_commands() {
    let home = tempfile::tempdir().unwrap();
    rota_cmd(home.path()).arg("--help").assert().success().stdout(
        predicate::str::contains("events")
            .and(predicate::str::contains("range"))
            .and(predicate::str::contains("config")),
    );
}

#[test]
fn test_version_flag() {
    let home = tempfile::tempdir().unwrap();
    rota_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("rota"));
}

#[test]
fn test_completions_zsh() {
    let home = tempfile::tempdir().unwrap();
    rota_cmd(home.path())
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_invalid_view_is_a_usage_error() {
    let home = tempfile::tempdir().unwrap();
    let output = rota_cmd(home.path())
        .args(["range", "--view", "year"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

// ── Range ───────────────────────────────────────────────────────────

#[test]
fn test_range_month_plain_prints_title() {
    let home = tempfile::tempdir().unwrap();
    rota_cmd(home.path())
        .args(["range", "--view", "month", "--date", "2024-03-14", "-o", "plain"])
        .assert()
        .success()
        .stdout("March 2024\n");
}

#[test]
fn test_range_week_table() {
    let home = tempfile::tempdir().unwrap();
    rota_cmd(home.path())
        .args(["range", "--view", "week", "--date", "2024-03-14"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("11 - 17 March 2024")
                .and(predicate::str::contains("2024-03-11T00:00:00.000Z"))
                .and(predicate::str::contains("2024-03-17T23:59:59.999Z")),
        );
}

#[test]
fn test_range_json_respects_timezone() {
    let home = tempfile::tempdir().unwrap();
    let output = rota_cmd(home.path())
        .args([
            "range", "--view", "month", "--date", "2024-03-14", "--tz", "Europe/Paris", "-o", "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["title"], "March 2024");
    assert_eq!(value["view"], "month");
    assert_eq!(value["timezone"], "Europe/Paris");
    assert_eq!(value["start"], "2024-02-29T23:00:00Z");
}

#[test]
fn test_range_unknown_timezone() {
    let home = tempfile::tempdir().unwrap();
    let output = rota_cmd(home.path())
        .args(["range", "--tz", "Mars/Olympus"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("Mars/Olympus"));
}

#[test]
fn test_range_uses_configured_week_start() {
    let home = tempfile::tempdir().unwrap();
    std::fs::write(
        home.path().join("config.toml"),
        "[display]\nweek_starts_on = \"sunday\"\ndefault_view = \"week\"\n",
    )
    .unwrap();
    rota_cmd(home.path())
        .args(["range", "--date", "2024-03-14", "-o", "plain"])
        .assert()
        .success()
        .stdout("10 - 16 March 2024\n");
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_honours_override() {
    let home = tempfile::tempdir().unwrap();
    rota_cmd(home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_init_then_show() {
    let home = tempfile::tempdir().unwrap();
    rota_cmd(home.path())
        .args(["config", "init", "--server", "https://planning.example.org"])
        .assert()
        .success();
    assert!(home.path().join("config.toml").exists());

    rota_cmd(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("https://planning.example.org")
                .and(predicate::str::contains("[cache]")),
        );

    let output = rota_cmd(home.path())
        .args(["config", "init"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(78));
    assert!(combined_output(&output).contains("--force"));

    rota_cmd(home.path())
        .args(["config", "init", "--force"])
        .assert()
        .success();
}

#[test]
fn test_config_show_reports_env_override() {
    let home = tempfile::tempdir().unwrap();
    let output = rota_cmd(home.path())
        .env("ROTA_CACHE__TTL", "90s")
        .args(["config", "show", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["cache"]["ttl"], "90s");
}

#[test]
fn test_invalid_config_value_exits_with_config_code() {
    let home = tempfile::tempdir().unwrap();
    std::fs::write(home.path().join("config.toml"), "[cache]\nttl = \"soon\"\n").unwrap();
    let output = rota_cmd(home.path())
        .args(["events", "--server", "http://127.0.0.1:9"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(78));
    assert!(combined_output(&output).contains("cache.ttl"));
}

// ── Events ──────────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_events_json_filters_by_type() {
    let home = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/calendar"))
        .and(query_param("eventTypes", "LEAVE"))
        .and(query_param("startDate", "2024-03-01T00:00:00.000Z"))
        .respond_with(ResponseTemplate::new(200).set_body_json(backend_events()))
        .expect(1)
        .mount(&server)
        .await;

    let output = rota_cmd(home.path())
        .args([
            "events",
            "--server",
            &server.uri(),
            "--date",
            "2024-03-14",
            "--type",
            "leave",
            "-o",
            "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let events = value.as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["id"], "leave-12");
    assert_eq!(events[0]["type"], "LEAVE");
    assert_eq!(events[0]["status"], "APPROVED");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_events_table_search() {
    let home = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/calendar"))
        .respond_with(ResponseTemplate::new(200).set_body_json(backend_events()))
        .mount(&server)
        .await;

    rota_cmd(home.path())
        .args([
            "events",
            "--server",
            &server.uri(),
            "--date",
            "2024-03-14",
            "--view",
            "week",
            "--search",
            "bloc sud",
        ])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("11 - 17 March 2024")
                .and(predicate::str::contains("Garde de nuit"))
                .and(predicate::str::contains("Grace Hopper"))
                .and(predicate::str::contains("Congé").not()),
        );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_events_backend_error() {
    let home = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/calendar"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": "Erreur serveur",
            "details": "database unreachable"
        })))
        .mount(&server)
        .await;

    let output = rota_cmd(home.path())
        .args(["events", "--server", &server.uri(), "--date", "2024-03-14"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(combined_output(&output).contains("database unreachable"));
}
