//! Integration tests for the `evm` binary against a mock backend.

use std::fs;
use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn evm(home: &Path, server: &MockServer) -> Command {
    let mut cmd = cargo_bin_cmd!("evm");
    cmd.env("EVM_HOME", home)
        .env("EVM_API_URL", server.uri())
        .env("NO_COLOR", "1")
        .env_remove("EVM_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

fn write_session(home: &Path, token: &str) {
    fs::create_dir_all(home).unwrap();
    fs::write(
        home.join("session.json"),
        json!({ "token": token }).to_string(),
    )
    .unwrap();
}

#[tokio::test]
async fn test_login_saves_session_and_lists_events() {
    let server = MockServer::start().await;
    let home = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .and(path("/api/auth/local"))
        .and(body_json(json!({ "identifier": "a@b.com", "password": "x" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jwt": "T1",
            "user": { "id": 1, "username": "alice", "email": "a@b.com" }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/events"))
        .and(header("authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 7, "name": "Launch", "description": "Q1" }
        ])))
        .mount(&server)
        .await;

    evm(home.path(), &server)
        .args(["auth", "login", "--identifier", "a@b.com", "--password", "x"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged in as alice (1 events)"));

    let saved: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(home.path().join("session.json")).unwrap())
            .unwrap();
    assert_eq!(saved["token"], "T1");

    evm(home.path(), &server)
        .args(["events", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Launch"))
        .stdout(predicate::str::contains("Q1"));

    evm(home.path(), &server)
        .args(["auth", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Authenticated"))
        .stdout(predicate::str::contains("alice"));
}

#[tokio::test]
async fn test_register_failure_shows_backend_reason() {
    let server = MockServer::start().await;
    let home = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .and(path("/api/auth/local/register"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": [{ "messages": [{ "message": "Email is already taken." }] }]
        })))
        .mount(&server)
        .await;

    evm(home.path(), &server)
        .args([
            "auth",
            "register",
            "--email",
            "a@b.com",
            "--username",
            "alice",
            "--password",
            "x",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Registration failed: Email is already taken."));

    assert!(!home.path().join("session.json").exists());
}

#[tokio::test]
async fn test_events_require_login() {
    let server = MockServer::start().await;
    let home = TempDir::new().unwrap();

    evm(home.path(), &server)
        .args(["events", "create", "Launch"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not authenticated"));

    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_create_posts_json_receipt() {
    let server = MockServer::start().await;
    let home = TempDir::new().unwrap();
    write_session(home.path(), "T1");

    Mock::given(method("POST"))
        .and(path("/api/events"))
        .and(header("authorization", "Bearer T1"))
        .and(body_json(json!({ "name": "Launch", "description": "Q1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 7 })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 7, "name": "Launch", "description": "Q1" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let output = evm(home.path(), &server)
        .args(["--format", "json", "events", "create", "Launch", "--description", "Q1"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["schemaVersion"], "evman.cli.v1");
    assert_eq!(value["data"]["receipt"]["kind"], "events.create");
    assert_eq!(value["data"]["receipt"]["event"]["id"], 7);
}

#[tokio::test]
async fn test_update_puts_to_event() {
    let server = MockServer::start().await;
    let home = TempDir::new().unwrap();
    write_session(home.path(), "T1");

    Mock::given(method("GET"))
        .and(path("/api/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 7, "name": "Launch", "description": "Q1" }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/events/7"))
        .and(body_json(json!({ "name": "Launch", "description": "Q2" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7, "name": "Launch", "description": "Q2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    evm(home.path(), &server)
        .args(["events", "update", "7", "--description", "Q2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated event 'Launch' (7)"));
}

#[tokio::test]
async fn test_delete_failure_is_generic() {
    let server = MockServer::start().await;
    let home = TempDir::new().unwrap();
    write_session(home.path(), "T1");

    Mock::given(method("DELETE"))
        .and(path("/api/events/7"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Not Found" })))
        .mount(&server)
        .await;

    evm(home.path(), &server)
        .args(["events", "delete", "7"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to delete event: Something went wrong"));

    let requests = server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 1, "no re-fetch after a failed delete");
}

#[tokio::test]
async fn test_logout_removes_session() {
    let server = MockServer::start().await;
    let home = TempDir::new().unwrap();
    write_session(home.path(), "T1");

    evm(home.path(), &server)
        .args(["auth", "logout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged out"));

    assert!(!home.path().join("session.json").exists());
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_shell_create_flow() {
    let server = MockServer::start().await;
    let home = TempDir::new().unwrap();
    write_session(home.path(), "T1");

    Mock::given(method("GET"))
        .and(path("/api/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 7, "name": "Launch", "description": "Q1" }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/events"))
        .and(body_json(json!({ "name": "Launch", "description": "Q1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 7 })))
        .expect(1)
        .mount(&server)
        .await;

    evm(home.path(), &server)
        .arg("shell")
        .write_stdin("set name Launch\nset description Q1\nsave\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Create Event"))
        .stdout(predicate::str::contains("Launch"));
}
