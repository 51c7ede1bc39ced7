use std::io::Write;
use std::net::TcpListener;
use std::time::Duration;

use reqwest::Client;
use tempfile::{NamedTempFile, TempDir};
use tokio::time::sleep;

/// Find an available port
fn get_available_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

/// Create a minimal valid config
fn minimal_config(port: u16, upload_dir: &std::path::Path) -> String {
    format!(
        r#"
[server]
host = "127.0.0.1"
port = {}

[uploads]
dir = "{}"
"#,
        port,
        upload_dir.display()
    )
}

fn write_config(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(content.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

/// Spawn the server and return a handle
fn spawn_server(config_path: &std::path::Path, api_key: Option<&str>) -> tokio::process::Child {
    let mut command = tokio::process::Command::new(env!("CARGO_BIN_EXE_lyricreel"));
    command
        .env("LYRICREEL_CONFIG", config_path)
        .env("RUST_LOG", "error") // Quiet logs during tests
        .env_remove("PORT")
        .env_remove("MINIMAX_API_KEY")
        .kill_on_drop(true);
    if let Some(key) = api_key {
        command.env("MINIMAX_API_KEY", key);
    }
    command.spawn().expect("Failed to spawn server")
}

/// Wait for server to be ready
async fn wait_for_server(port: u16, max_attempts: u32) -> bool {
    let client = Client::new();
    for _ in 0..max_attempts {
        if client
            .get(format!("http://127.0.0.1:{}/api/health", port))
            .send()
            .await
            .is_ok()
        {
            return true;
        }
        sleep(Duration::from_millis(50)).await;
    }
    false
}

#[tokio::test]
async fn test_health_endpoint_with_api_key() {
    let port = get_available_port();
    let upload_dir = TempDir::new().unwrap();
    let config = write_config(&minimal_config(port, &upload_dir.path().join("uploads")));

    let mut server = spawn_server(config.path(), Some("sk-test"));
    assert!(
        wait_for_server(port, 100).await,
        "Server did not start in time"
    );

    let json: serde_json::Value = Client::new()
        .get(format!("http://127.0.0.1:{}/api/health", port))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse JSON");
    assert_eq!(json["status"], "ok");
    assert_eq!(json["apiKeyConfigured"], true);

    // The upload directory is created at startup
    assert!(upload_dir.path().join("uploads").is_dir());

    server.kill().await.ok();
}

#[tokio::test]
async fn test_missing_api_key_degrades_generate() {
    let port = get_available_port();
    let upload_dir = TempDir::new().unwrap();
    let config = write_config(&minimal_config(port, &upload_dir.path().join("uploads")));

    let mut server = spawn_server(config.path(), None);
    assert!(
        wait_for_server(port, 100).await,
        "Server did not start in time"
    );

    let client = Client::new();
    let json: serde_json::Value = client
        .get(format!("http://127.0.0.1:{}/api/health", port))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(json["apiKeyConfigured"], false);

    let form = reqwest::multipart::Form::new().text("theme", "ocean");
    let response = client
        .post(format!("http://127.0.0.1:{}/api/generate", port))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 500);
    let json: serde_json::Value = response.json().await.unwrap();
    assert!(json["error"].as_str().unwrap().contains("MINIMAX_API_KEY"));

    server.kill().await.ok();
}

#[tokio::test]
async fn test_invalid_config_exits() {
    let config = write_config("[server]\nport = 0\n");

    let mut server = spawn_server(config.path(), None);
    let status = tokio::time::timeout(Duration::from_secs(10), server.wait())
        .await
        .expect("Server did not exit")
        .unwrap();
    assert!(!status.success());
}

#[tokio::test]
async fn test_invalid_config_reports_reason_once() {
    let config = write_config("[server]\nport = 0\n");

    let output = tokio::process::Command::new(env!("CARGO_BIN_EXE_lyricreel"))
        .env("LYRICREEL_CONFIG", config.path())
        .env("RUST_LOG", "error")
        .env("NO_COLOR", "1")
        .env_remove("PORT")
        .env_remove("MINIMAX_API_KEY")
        .stdout(std::process::Stdio::piped())
        .stderr(std::process::Stdio::piped())
        .kill_on_drop(true)
        .output();
    let output = tokio::time::timeout(Duration::from_secs(10), output)
        .await
        .expect("Server did not exit")
        .unwrap();

    assert!(!output.status.success());
    let logs = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(logs.contains("server.port"), "logs: {}", logs);
    assert_eq!(
        logs.matches("Configuration validation failed").count(),
        1,
        "logs: {}",
        logs
    );
}
