//! Generative media provider integration.
//!
//! The orchestrator only talks to [`MediaProvider`]. [`MiniMaxClient`] is the
//! production implementation; `testing::MockMediaProvider` scripts responses
//! for tests.

mod minimax;
pub mod normalize;
mod types;

pub use minimax::MiniMaxClient;
pub use types::{ImageJob, JobStatus, MusicJob, VideoJob};

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when calling the provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Transport failure (connect, timeout, body read).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response.
    #[error("Provider error ({status}): {message}")]
    Api { status: u16, message: String },

    /// 2xx response whose `base_resp.status_code` is non-zero.
    #[error("Provider rejected request ({code}): {message}")]
    Rejected { code: i64, message: String },

    /// Failed to parse response.
    #[error("Failed to parse provider response: {0}")]
    Parse(String),

    /// Client not configured (missing API key).
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    /// Provider reported the job itself as failed.
    #[error("{0}")]
    Failed(String),
}

/// Generative media operations used by the orchestrator.
#[async_trait]
pub trait MediaProvider: Send + Sync {
    /// Whether credentials are available. Submissions are refused otherwise.
    fn is_configured(&self) -> bool {
        true
    }

    /// Start generating an image from a text prompt.
    async fn generate_image(&self, prompt: &str) -> Result<ImageJob, ProviderError>;

    /// Query an asynchronous image job.
    async fn query_image(&self, task_id: &str) -> Result<ImageJob, ProviderError>;

    /// Write song lyrics for a theme.
    async fn generate_lyrics(&self, theme: &str) -> Result<String, ProviderError>;

    /// Synthesize music for a theme with the given lyrics.
    async fn generate_music(&self, theme: &str, lyrics: &str) -> Result<MusicJob, ProviderError>;

    /// Start an image-to-video job.
    async fn generate_video(&self, image_url: &str, prompt: &str)
        -> Result<VideoJob, ProviderError>;

    /// Query a video job. A succeeded job carries a playable URL.
    async fn query_video(&self, task_id: &str) -> Result<VideoJob, ProviderError>;
}
