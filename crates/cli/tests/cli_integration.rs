use std::process::{Output, Stdio};

use dradis_search_auth::{CredentialStore, API_KEY_KEY, BASE_URL_KEY};
use serde_json::json;
use tempfile::TempDir;
use tokio::process::Command;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Run the binary isolated from the caller's environment and home directory.
async fn run(home: &TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_dradis-search"))
        .args(args)
        .arg("--config")
        .arg(home.path().join("config.yaml"))
        .env_remove("DRADIS_BASE_URL")
        .env_remove("DRADIS_API_KEY")
        .env_remove("RUST_LOG")
        .env("HOME", home.path())
        .stdin(Stdio::null())
        .output()
        .await
        .expect("Failed to execute dradis-search")
}

async fn mount_two_projects(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/projects"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"id": 1}, {"id": 2}])),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/issues"))
        .and(header("Dradis-Project-Id", "1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"id": 10, "title": "XSS in login"}])),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/issues"))
        .and(header("Dradis-Project-Id", "2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"id": 20, "title": "SQL injection"}])),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_cli_help() {
    let home = TempDir::new().unwrap();
    let output = run(&home, &["--help"]).await;

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"));
    assert!(stdout.contains("--term"));
    assert!(stdout.contains("--base-url"));
    assert!(stdout.contains("--match-field"));
}

#[tokio::test]
async fn test_missing_term_is_a_usage_error() {
    let home = TempDir::new().unwrap();
    let output = run(&home, &["--base-url", "https://example.com", "--api-key", "k"]).await;

    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
}

#[tokio::test]
async fn test_search_with_flags() {
    let mock_server = MockServer::start().await;
    mount_two_projects(&mock_server).await;

    let home = TempDir::new().unwrap();
    let uri = mock_server.uri();
    let output = run(
        &home,
        &["--base-url", &uri, "--api-key", "abc123", "--term", "injection"],
    )
    .await;

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        format!("Found the following issues:\n1: {uri}/projects/2/issues/20 (SQL injection)\n")
    );
}

#[tokio::test]
async fn test_no_results_notice() {
    let mock_server = MockServer::start().await;
    mount_two_projects(&mock_server).await;

    let home = TempDir::new().unwrap();
    let uri = mock_server.uri();
    let output = run(&home, &["--base-url", &uri, "--api-key", "abc123", "-q", "csrf"]).await;

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "No results found\n");
}

#[tokio::test]
async fn test_remote_failure_exits_non_zero_without_results() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/projects"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let home = TempDir::new().unwrap();
    let uri = mock_server.uri();
    let output = run(&home, &["--base-url", &uri, "--api-key", "abc123", "--term", "sql"]).await;

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("500"));
}

#[tokio::test]
async fn test_unreachable_server_exits_non_zero() {
    let home = TempDir::new().unwrap();
    let output = run(
        &home,
        &["--base-url", "http://127.0.0.1:9", "--api-key", "abc123", "--term", "sql"],
    )
    .await;

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}

#[tokio::test]
async fn test_saved_credentials_are_used_without_prompting() {
    let mock_server = MockServer::start().await;
    mount_two_projects(&mock_server).await;

    let home = TempDir::new().unwrap();
    let creds = home.path().join("credentials");
    CredentialStore::new(&creds)
        .set_all([(BASE_URL_KEY, mock_server.uri().as_str()), (API_KEY_KEY, "abc123")])
        .unwrap();

    let output = run(
        &home,
        &["--credentials", creds.to_str().unwrap(), "--term", "XSS", "--output", "quiet"],
    )
    .await;

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        format!("{}/projects/1/issues/10\n", mock_server.uri())
    );
}

#[tokio::test]
async fn test_missing_credentials_without_input_fails() {
    let home = TempDir::new().unwrap();
    let creds = home.path().join("credentials");

    let output = run(&home, &["--credentials", creds.to_str().unwrap(), "--term", "sql"]).await;

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(!creds.exists());
}
