//! Integration tests for the `update-formula` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::path::Path;
use std::time::Duration;
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEMPLATE: &str = "version \"{{.Version}}\"\nurl \"{{.DownloadUrlLinuxAmd64}}\"\nsha256 \"{{.Sha256LinuxAmd64}}\"\n";

/// A port with nothing listening, so any request fails fast.
const UNREACHABLE_API: &str = "http://127.0.0.1:9";

fn update_formula(dir: &Path, api_url: &str) -> Command {
    let template = dir.join("neokikoeru.rb.tmpl");
    std::fs::write(&template, TEMPLATE).unwrap();

    let mut cmd = Command::new(env!("CARGO_BIN_EXE_update-formula"));
    cmd.current_dir(dir)
        .env_remove("GITHUB_TOKEN")
        .env_remove("GH_TOKEN")
        .env_remove("RUST_LOG")
        .arg("--template")
        .arg(&template)
        .arg("--output")
        .arg(dir.join("neokikoeru.rb"))
        .arg("--api-url")
        .arg(api_url);
    cmd
}

async fn mock_api() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/vscodev/neokikoeru/releases/tags/v2.0.1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "v2.0.1",
            "assets": [
                {
                    "name": "neokikoeru-linux-amd64.tar.gz",
                    "digest": "sha256:feedbeef",
                    "browser_download_url": "https://example.com/neokikoeru-linux-amd64.tar.gz"
                }
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Not Found" })))
        .mount(&server)
        .await;
    server
}

/// A mock API that fails the test if it receives any request.
async fn untouched_api() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn missing_version_fails_before_request() {
    let server = untouched_api().await;
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().to_path_buf();
    let api_url = server.uri();

    tokio::task::spawn_blocking(move || {
        update_formula(&root, &api_url)
            .env_remove("NEOKIKOERU_VERSION")
            .assert()
            .failure()
            .stderr(predicate::str::contains("$NEOKIKOERU_VERSION is not set"));
    })
    .await
    .unwrap();

    assert!(!dir.path().join("neokikoeru.rb").exists());
    server.verify().await;
}

#[tokio::test]
async fn invalid_version_fails_before_request() {
    let server = untouched_api().await;
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().to_path_buf();
    let api_url = server.uri();

    tokio::task::spawn_blocking(move || {
        for version in ["1.2", "v1.2.3", "1.2.3-rc.1", "latest"] {
            update_formula(&root, &api_url)
                .env("NEOKIKOERU_VERSION", version)
                .assert()
                .failure()
                .stderr(predicate::str::contains("is not a valid version"));
        }
    })
    .await
    .unwrap();

    assert!(!dir.path().join("neokikoeru.rb").exists());
    server.verify().await;
}

#[test]
fn unreachable_api_fails() {
    let dir = tempfile::tempdir().unwrap();

    update_formula(dir.path(), UNREACHABLE_API)
        .env("NEOKIKOERU_VERSION", "2.0.1")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Request to"));

    assert!(!dir.path().join("neokikoeru.rb").exists());
}

#[tokio::test]
async fn writes_formula() {
    let server = mock_api().await;
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().to_path_buf();
    let api_url = server.uri();

    tokio::task::spawn_blocking(move || {
        update_formula(&root, &api_url)
            .env("NEOKIKOERU_VERSION", "2.0.1")
            .assert()
            .success();
    })
    .await
    .unwrap();

    assert_eq!(
        std::fs::read_to_string(dir.path().join("neokikoeru.rb")).unwrap(),
        "version \"2.0.1\"\nurl \"https://example.com/neokikoeru-linux-amd64.tar.gz\"\nsha256 \"feedbeef\"\n"
    );
}

#[tokio::test]
async fn dry_run_prints_without_writing() {
    let server = mock_api().await;
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().to_path_buf();
    let api_url = server.uri();

    tokio::task::spawn_blocking(move || {
        update_formula(&root, &api_url)
            .env("NEOKIKOERU_VERSION", "2.0.1")
            .arg("--dry-run")
            .assert()
            .success()
            .stdout(predicate::str::contains("sha256 \"feedbeef\""));
    })
    .await
    .unwrap();

    assert!(!dir.path().join("neokikoeru.rb").exists());
}

#[tokio::test]
async fn api_error_message_is_logged() {
    let server = mock_api().await;
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().to_path_buf();
    let api_url = server.uri();

    tokio::task::spawn_blocking(move || {
        update_formula(&root, &api_url)
            .env("NEOKIKOERU_VERSION", "9.9.9")
            .assert()
            .failure()
            .code(1)
            .stderr(predicate::str::contains("Not Found"));
    })
    .await
    .unwrap();

    assert!(!dir.path().join("neokikoeru.rb").exists());
}

#[tokio::test]
async fn timeout_cause_is_logged() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "name": "v2.0.1", "assets": [] }))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().to_path_buf();
    let api_url = server.uri();

    tokio::task::spawn_blocking(move || {
        update_formula(&root, &api_url)
            .env("NEOKIKOERU_VERSION", "2.0.1")
            .args(["--timeout", "1"])
            .assert()
            .failure()
            .code(1)
            .stderr(predicate::str::contains("timed out"));
    })
    .await
    .unwrap();

    assert!(!dir.path().join("neokikoeru.rb").exists());
}
