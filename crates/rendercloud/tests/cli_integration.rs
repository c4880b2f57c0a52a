//! CLI integration tests for the `rendercloud` binary.
//!
//! Every test points the config directory and working directory at a
//! scratch directory so no user configuration leaks in.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Get an isolated command for the rendercloud binary.
fn rendercloud(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("rendercloud").unwrap();
    cmd.current_dir(dir.path())
        .env("RENDERCLOUD_CONFIG_DIR", dir.path())
        .env_remove("RENDER_API_KEY")
        .env_remove("RENDER_API_URL");
    cmd
}

// ─────────────────────────────────────────────────────────────────────────────
// Help and Version Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_help_lists_subcommands() {
    let dir = TempDir::new().unwrap();
    rendercloud(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("resources"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("verify"))
        .stdout(predicate::str::contains("trigger"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_version_displays() {
    let dir = TempDir::new().unwrap();
    rendercloud(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("rendercloud"));
}

#[test]
fn test_unknown_subcommand_fails() {
    let dir = TempDir::new().unwrap();
    rendercloud(&dir).arg("explode").assert().failure();
}

// ─────────────────────────────────────────────────────────────────────────────
// Resources
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_resources_overview() {
    let dir = TempDir::new().unwrap();
    rendercloud(&dir)
        .arg("resources")
        .assert()
        .success()
        .stdout(predicate::str::contains("service"))
        .stdout(predicate::str::contains("Key Value (Redis)"))
        .stdout(predicate::str::contains("environmentGroup"))
        .stdout(predicate::str::contains("webhook"));
}

#[test]
fn test_resources_json_is_node_description() {
    let dir = TempDir::new().unwrap();
    let output = rendercloud(&dir)
        .args(["--json", "resources"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let description: Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(description["name"], "renderCloud");
    assert_eq!(description["properties"][0]["name"], "resource");
    assert_eq!(
        description["properties"][0]["options"]
            .as_array()
            .unwrap()
            .len(),
        12
    );
}

#[test]
fn test_resources_single_resource() {
    let dir = TempDir::new().unwrap();
    rendercloud(&dir)
        .args(["resources", "deploy", "--operation", "trigger"])
        .assert()
        .success()
        .stdout(predicate::str::contains("trigger"))
        .stdout(predicate::str::contains("serviceId"));
}

#[test]
fn test_resources_unknown_resource() {
    let dir = TempDir::new().unwrap();
    rendercloud(&dir)
        .args(["resources", "mainframe"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown resource: mainframe"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Run
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_run_requires_api_key() {
    let dir = TempDir::new().unwrap();
    rendercloud(&dir)
        .args(["run", "service", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No Render API key found"));
}

#[test]
fn test_run_rejects_bad_param() {
    let dir = TempDir::new().unwrap();
    rendercloud(&dir)
        .args(["run", "service", "get", "-p", "serviceId"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected KEY=VALUE"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_run_against_mock_api() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/services"))
        .and(query_param("limit", "1"))
        .and(header("authorization", "Bearer rnd_cli"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"service": {"id": "srv-1", "name": "api"}, "cursor": "c1"},
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = rendercloud(&dir)
        .env("RENDER_API_KEY", "rnd_cli")
        .args(["--json", "--api-url", &server.uri()])
        .args(["run", "service", "list", "-p", "limit=1"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let items: Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(
        items,
        json!([{"json": {"id": "srv-1", "name": "api"}, "pairedItem": {"item": 0}}])
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_run_continue_on_fail_reports_invalid_id() {
    let server = MockServer::start().await;

    let dir = TempDir::new().unwrap();
    let output = rendercloud(&dir)
        .env("RENDER_API_KEY", "rnd_cli")
        .args(["--json", "--api-url", &server.uri()])
        .args([
            "run",
            "service",
            "get",
            "-p",
            "serviceId=bad-1",
            "--continue-on-fail",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let items: Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(
        items[0]["json"]["error"],
        "Invalid service ID format. Expected format: srv-xxxxx, got: bad-1"
    );
    assert!(server.received_requests().await.unwrap().is_empty());
}

// ─────────────────────────────────────────────────────────────────────────────
// Trigger
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_trigger_create_requires_callback_url() {
    let dir = TempDir::new().unwrap();
    rendercloud(&dir)
        .args(["trigger", "create"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No callback URL"));
}

#[test]
fn test_trigger_create_requires_owner() {
    let dir = TempDir::new().unwrap();
    rendercloud(&dir)
        .args(["trigger", "create", "--url", "https://hooks.example.com/webhook"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("webhook.owner_id is required"));
}

#[test]
fn test_trigger_create_rejects_unknown_event() {
    let dir = TempDir::new().unwrap();
    rendercloud(&dir)
        .args([
            "trigger",
            "create",
            "--url",
            "https://hooks.example.com/webhook",
            "--owner-id",
            "tea-1",
            "--events",
            "deploy_succeeded,deploy_exploded",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown webhook event: deploy_exploded"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_trigger_create_then_delete() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/webhooks"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "whk-42"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/webhooks/whk-42"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    rendercloud(&dir)
        .env("RENDER_API_KEY", "rnd_cli")
        .args(["--json", "--api-url", &server.uri()])
        .args([
            "trigger",
            "create",
            "--url",
            "https://hooks.example.com/webhook",
            "--owner-id",
            "tea-1",
            "--events",
            "deploy_failed",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"created\""))
        .stdout(predicate::str::contains("whk-42"));

    let state_file = dir.path().join("state").join("default.json");
    let state: Value = serde_json::from_str(&std::fs::read_to_string(&state_file).unwrap()).unwrap();
    assert_eq!(state["webhookId"], "whk-42");
    assert_eq!(state["webhookSecret"].as_str().unwrap().len(), 64);

    rendercloud(&dir)
        .env("RENDER_API_KEY", "rnd_cli")
        .args(["--json", "--api-url", &server.uri()])
        .args(["trigger", "delete"])
        .assert()
        .success()
        .stdout(predicate::str::contains("whk-42"));

    assert!(!state_file.exists());
}

// ─────────────────────────────────────────────────────────────────────────────
// Config
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_config_path_uses_config_dir() {
    let dir = TempDir::new().unwrap();
    rendercloud(&dir)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_init_then_show() {
    let dir = TempDir::new().unwrap();
    rendercloud(&dir)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created config file"));
    assert!(dir.path().join("config.toml").is_file());

    rendercloud(&dir)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));

    rendercloud(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ loaded"))
        .stdout(predicate::str::contains("deploy_succeeded"));
}

#[test]
fn test_config_show_redacts_key() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        "[api]\napi_key = \"rnd_very_secret\"\n",
    )
    .unwrap();

    rendercloud(&dir)
        .args(["--json", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("********"))
        .stdout(predicate::str::contains("rnd_very_secret").not());
}
