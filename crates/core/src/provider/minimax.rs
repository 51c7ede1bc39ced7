//! MiniMax API client.
//!
//! MiniMax requires:
//! - `Authorization: Bearer <key>` on every request
//! - JSON bodies; every response carries a `base_resp` status envelope

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, warn};

use super::normalize;
use super::types::{
    BaseResp, FileRetrieveResponse, ImageGenerationResponse, ImageJob, LyricsResponse, MusicJob,
    MusicResponse, VideoGenerationResponse, VideoJob, VideoStatusResponse,
};
use super::{MediaProvider, ProviderError};
use crate::config::ProviderConfig;
use crate::metrics::{PROVIDER_REQUESTS, PROVIDER_REQUEST_DURATION};

/// MiniMax API client.
pub struct MiniMaxClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    image_model: String,
    music_model: String,
    video_model: String,
}

impl MiniMaxClient {
    /// Create a new MiniMax client. A missing API key is accepted here;
    /// requests then fail with [`ProviderError::NotConfigured`].
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .user_agent(format!("LyricReel/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key().map(str::to_string),
            image_model: config.image_model.clone(),
            music_model: config.music_model.clone(),
            video_model: config.video_model.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        path: &str,
        body: serde_json::Value,
    ) -> Result<T, ProviderError> {
        let request = self.client.post(self.url(path)).json(&body);
        self.send(operation, request).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ProviderError> {
        let request = self.client.get(self.url(path)).query(query);
        self.send(operation, request).await
    }

    /// Send a request, recording metrics for the operation.
    async fn send<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<T, ProviderError> {
        let start = Instant::now();
        let result = self.execute(operation, request).await;

        let outcome = if result.is_ok() { "success" } else { "error" };
        PROVIDER_REQUESTS
            .with_label_values(&[operation, outcome])
            .inc();
        PROVIDER_REQUEST_DURATION
            .with_label_values(&[operation])
            .observe(start.elapsed().as_secs_f64());

        result
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<T, ProviderError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            ProviderError::NotConfigured("MINIMAX_API_KEY is not set".to_string())
        })?;

        debug!("MiniMax {}: sending request", operation);

        let response = request.bearer_auth(api_key).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = normalize::error_message(&body);
            warn!("MiniMax {} failed with {}: {}", operation, status, message);
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let value: serde_json::Value = serde_json::from_str(&body).map_err(|e| {
            ProviderError::Parse(format!("Failed to parse {} response: {}", operation, e))
        })?;

        if let Some(base) = value.get("base_resp") {
            let base: BaseResp = serde_json::from_value(base.clone()).map_err(|e| {
                ProviderError::Parse(format!("Malformed base_resp in {}: {}", operation, e))
            })?;
            if base.status_code != 0 {
                warn!(
                    "MiniMax {} rejected ({}): {}",
                    operation, base.status_code, base.status_msg
                );
                return Err(ProviderError::Rejected {
                    code: base.status_code,
                    message: base.status_msg,
                });
            }
        }

        serde_json::from_value(value).map_err(|e| {
            ProviderError::Parse(format!("Unexpected {} response shape: {}", operation, e))
        })
    }

    /// Resolve a generated file id into a download URL.
    async fn resolve_file_url(&self, file_id: &str) -> Result<String, ProviderError> {
        let resp: FileRetrieveResponse = self
            .get_json("file_retrieve", "/v1/files/retrieve", &[("file_id", file_id)])
            .await?;

        normalize::file_download_url(&resp).ok_or_else(|| {
            ProviderError::Parse(format!("File {} has no download URL", file_id))
        })
    }
}

#[async_trait]
impl MediaProvider for MiniMaxClient {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn generate_image(&self, prompt: &str) -> Result<ImageJob, ProviderError> {
        let resp: ImageGenerationResponse = self
            .post_json(
                "image_generation",
                "/v1/image_generation",
                json!({
                    "model": self.image_model,
                    "prompt": prompt,
                    "aspect_ratio": "16:9",
                    "response_format": "url",
                    "n": 1,
                    "prompt_optimizer": true,
                }),
            )
            .await?;

        Ok(normalize::image_job(&resp))
    }

    async fn query_image(&self, task_id: &str) -> Result<ImageJob, ProviderError> {
        let resp: ImageGenerationResponse = self
            .get_json(
                "image_query",
                "/v1/query/image_generation",
                &[("task_id", task_id)],
            )
            .await?;

        Ok(normalize::image_job(&resp))
    }

    async fn generate_lyrics(&self, theme: &str) -> Result<String, ProviderError> {
        let resp: LyricsResponse = self
            .post_json(
                "lyrics_generation",
                "/v1/lyrics_generation",
                json!({
                    "mode": "write_full_song",
                    "prompt": theme,
                }),
            )
            .await?;

        normalize::lyrics(&resp)
            .ok_or_else(|| ProviderError::Parse("Lyrics response has no lyrics".to_string()))
    }

    async fn generate_music(&self, theme: &str, lyrics: &str) -> Result<MusicJob, ProviderError> {
        let resp: MusicResponse = self
            .post_json(
                "music_generation",
                "/v1/music_generation",
                json!({
                    "model": self.music_model,
                    "prompt": theme,
                    "lyrics": lyrics,
                    "output_format": "url",
                    "audio_setting": {
                        "sample_rate": 44100,
                        "bitrate": 256000,
                        "format": "mp3",
                    },
                }),
            )
            .await?;

        Ok(normalize::music_job(&resp))
    }

    async fn generate_video(
        &self,
        image_url: &str,
        prompt: &str,
    ) -> Result<VideoJob, ProviderError> {
        let resp: VideoGenerationResponse = self
            .post_json(
                "video_generation",
                "/v1/video_generation",
                json!({
                    "model": self.video_model,
                    "first_frame_image": image_url,
                    "prompt": prompt,
                }),
            )
            .await?;

        Ok(normalize::video_submission(&resp))
    }

    async fn query_video(&self, task_id: &str) -> Result<VideoJob, ProviderError> {
        let resp: VideoStatusResponse = self
            .get_json(
                "video_query",
                "/v1/query/video_generation",
                &[("task_id", task_id)],
            )
            .await?;

        let (mut job, unresolved_file) = normalize::video_status(&resp);
        if let Some(file_id) = unresolved_file {
            debug!("Resolving video file {} for task {}", file_id, task_id);
            job.video_url = Some(self.resolve_file_url(&file_id).await?);
        }
        if job.task_id.is_none() {
            job.task_id = Some(task_id.to_string());
        }

        Ok(job)
    }
}
