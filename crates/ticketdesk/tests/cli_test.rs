//! End-to-end tests of the `ticketdesk` binary's output streams.

use serde_json::{Value, json};
use std::io::Write;
use std::process::Output;
use tempfile::{NamedTempFile, TempDir};
use tokio::process::Command;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn write_config(base_url: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("Failed to create temp file");
    write!(
        file,
        r#"
[discord]
token = "cli-token"
guild_id = "10"
support_team_role = "77"
ticket_categories = ["100"]

[api]
base_url = "{}"
request_timeout_secs = 5

[retry]
max_attempts = 1
"#,
        base_url
    )
    .expect("Failed to write config");
    file
}

/// Runs the binary in an empty directory with debug logging enabled.
async fn run(config: &NamedTempFile, args: &[&str]) -> Output {
    let home = TempDir::new().expect("Failed to create temp dir");
    Command::new(env!("CARGO_BIN_EXE_ticketdesk"))
        .arg("--config")
        .arg(config.path())
        .args(args)
        .current_dir(home.path())
        .env("HOME", home.path())
        .env("RUST_LOG", "debug")
        .output()
        .await
        .expect("Failed to run ticketdesk")
}

#[tokio::test]
async fn test_request_prints_only_json_on_stdout() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v10/gateway"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"url": "wss://gateway"})))
        .expect(1)
        .mount(&server)
        .await;

    let config = write_config(&server.uri());
    let output = run(&config, &["request", "GET", "gateway"]).await;
    assert!(output.status.success());

    let stdout: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(stdout, json!({"url": "wss://gateway"}));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Sending Discord request"), "stderr: {}", stderr);
    Ok(())
}

#[tokio::test]
async fn test_failed_request_leaves_stdout_empty() {
    let config = write_config("http://127.0.0.1:1");
    let output = run(&config, &["request", "GET", "gateway"]).await;

    assert!(!output.status.success());
    assert!(output.stdout.is_empty(), "stdout: {:?}", output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Network request failed"), "stderr: {}", stderr);
}

#[tokio::test]
async fn test_open_ticket_prints_only_channel_id() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v10/guilds/10/channels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v10/guilds/10/channels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "500", "type": 0, "name": "support-bob", "parent_id": "100"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v10/channels/500/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "900"})))
        .expect(1)
        .mount(&server)
        .await;

    let config = write_config(&server.uri());
    let output = run(
        &config,
        &[
            "open-ticket",
            "--title",
            "Cannot log in",
            "--description",
            "Reset mail never arrives",
            "--user-id",
            "17",
            "--username",
            "bob",
            "--email",
            "bob@example.com",
        ],
    )
    .await;

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(String::from_utf8(output.stdout)?, "500\n");
    assert!(String::from_utf8_lossy(&output.stderr).contains("Opened ticket"));
    Ok(())
}
