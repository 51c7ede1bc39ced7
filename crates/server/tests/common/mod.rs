//! Common test utilities for E2E testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with a scripted media provider injected, so the HTTP surface can be
//! exercised without network access.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use lyricreel_core::{
    testing::MockMediaProvider, Config, InMemoryTaskStore, MediaProvider, TaskStore, UploadStore,
};
use lyricreel_server::state::AppState;

/// Re-export fixtures for test convenience
pub use lyricreel_core::testing::fixtures;

const BOUNDARY: &str = "lyricreel-test-boundary";

/// Test fixture for E2E testing with a mock provider.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_generate() {
///     let fixture = TestFixture::new();
///
///     let response = fixture
///         .post_form("/api/generate", Some(("cover.png", b"png")), Some("ocean"))
///         .await;
///
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock provider - script responses and inspect calls
    pub provider: Arc<MockMediaProvider>,
    /// Task registry shared with the router
    pub tasks: Arc<InMemoryTaskStore>,
    /// Temporary directory holding uploads
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a new test fixture with default mocks.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a test fixture with custom configuration.
    ///
    /// The upload directory is always redirected into a temp dir.
    pub fn with_config(mut config: Config) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        config.uploads.dir = temp_dir.path().join("uploads");

        let provider = Arc::new(MockMediaProvider::new());
        let tasks = Arc::new(InMemoryTaskStore::new());
        let uploads = UploadStore::from_config(&config.uploads);

        let state = Arc::new(AppState::new(
            config,
            Arc::clone(&provider) as Arc<dyn MediaProvider>,
            Arc::clone(&tasks) as Arc<dyn TaskStore>,
            uploads,
        ));

        let router = lyricreel_server::api::create_router(state);

        Self {
            router,
            provider,
            tasks,
            temp_dir,
        }
    }

    /// Files currently in the upload directory.
    pub fn uploaded_files(&self) -> Vec<std::path::PathBuf> {
        match std::fs::read_dir(self.temp_dir.path().join("uploads")) {
            Ok(entries) => entries.filter_map(|e| e.ok()).map(|e| e.path()).collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// Send a GET request and return the raw text body.
    pub async fn get_text(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        let (status, bytes) = self.send_raw(request).await;
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Send a multipart form with optional `image` and `theme` fields.
    pub async fn post_form(
        &self,
        path: &str,
        image: Option<(&str, &[u8])>,
        theme: Option<&str>,
    ) -> TestResponse {
        let body = multipart_body(image, theme);
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let (status, body_bytes) = self.send_raw(request).await;
        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };
        TestResponse { status, body }
    }

    async fn send_raw(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();
        (status, body_bytes.to_vec())
    }
}

/// Build a `multipart/form-data` body by hand.
pub fn multipart_body(image: Option<(&str, &[u8])>, theme: Option<&str>) -> Vec<u8> {
    let mut body = Vec::new();
    if let Some(theme) = theme {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"theme\"\r\n\r\n{}\r\n",
                BOUNDARY, theme
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, bytes)) = image {
        body.extend_from_slice(
            format!(
                concat!(
                    "--{}\r\nContent-Disposition: form-data; name=\"image\"; ",
                    "filename=\"{}\"\r\nContent-Type: image/png\r\n\r\n",
                ),
                BOUNDARY, file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}
