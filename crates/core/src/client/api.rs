use std::time::Duration;

use reqwest::multipart::{Form, Part};
use tracing::debug;

use super::types::{ErrorReply, GenerateReply, HealthReply, ImageUpload, StatusReply};
use super::ClientError;
use crate::config::DEFAULT_MAX_UPLOAD_BYTES;

/// Largest image the client will send.
pub const MAX_IMAGE_BYTES: usize = DEFAULT_MAX_UPLOAD_BYTES;

/// Check a submission before touching the network.
pub fn validate_submission(image: Option<&[u8]>, theme: &str) -> Result<(), ClientError> {
    if theme.trim().is_empty() {
        return Err(ClientError::Invalid("Please enter a theme".to_string()));
    }
    let image = match image {
        Some(bytes) if !bytes.is_empty() => bytes,
        _ => return Err(ClientError::Invalid("Please select an image".to_string())),
    };
    if image.len() > MAX_IMAGE_BYTES {
        return Err(ClientError::Invalid(format!(
            "Image is {} bytes; the limit is {} bytes",
            image.len(),
            MAX_IMAGE_BYTES
        )));
    }
    Ok(())
}

/// HTTP client for the generation service.
#[derive(Debug, Clone)]
pub struct GenerationClient {
    client: reqwest::Client,
    base_url: String,
}

impl GenerationClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .user_agent(format!("LyricReel-Submit/{}", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn health(&self) -> Result<HealthReply, ClientError> {
        let response = self
            .client
            .get(format!("{}/api/health", self.base_url))
            .send()
            .await?;
        read_json(response).await
    }

    /// Send the image and theme to `/api/generate`.
    pub async fn submit(
        &self,
        image: &ImageUpload,
        theme: &str,
    ) -> Result<GenerateReply, ClientError> {
        let part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(image.mime_type())?;
        let form = Form::new()
            .part("image", part)
            .text("theme", theme.to_string());

        debug!("Submitting {} ({} bytes)", image.file_name, image.bytes.len());
        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .multipart(form)
            .send()
            .await?;
        read_json(response).await
    }

    pub async fn status(&self, task_id: &str) -> Result<StatusReply, ClientError> {
        let response = self
            .client
            .get(format!("{}/api/status/{}", self.base_url, task_id))
            .send()
            .await?;
        read_json(response).await
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ClientError> {
    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorReply>(&text)
            .map(|e| e.error)
            .unwrap_or_else(|_| {
                if text.is_empty() {
                    status.to_string()
                } else {
                    text
                }
            });
        return Err(ClientError::Server {
            status: status.as_u16(),
            message,
        });
    }
    Ok(response.json().await?)
}
