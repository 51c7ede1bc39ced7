//! Submission orchestrator.
//!
//! Runs the provider calls strictly in sequence and returns as soon as the
//! video job has been started. The video itself is never awaited here.

use std::sync::Arc;

use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::lyrics::{image_prompt, video_prompt, FALLBACK_LYRICS};
use super::types::{GenerateOutcome, GenerateRequest, GenerationStep, OutcomeStatus};
use super::GenerationError;
use crate::config::GenerationConfig;
use crate::metrics::{GENERATIONS_TOTAL, IMAGE_POLLS, LYRICS_FALLBACKS};
use crate::provider::{JobStatus, MediaProvider, ProviderError};
use crate::task::{GenerationTask, TaskStore};

/// Turns one submission into provider jobs and an immediate partial result.
pub struct GenerationOrchestrator {
    provider: Arc<dyn MediaProvider>,
    tasks: Arc<dyn TaskStore>,
    config: GenerationConfig,
}

impl GenerationOrchestrator {
    pub fn new(
        provider: Arc<dyn MediaProvider>,
        tasks: Arc<dyn TaskStore>,
        config: GenerationConfig,
    ) -> Self {
        Self {
            provider,
            tasks,
            config,
        }
    }

    /// Run a submission.
    ///
    /// Image, music and video failures abort the submission. Lyrics failures
    /// never do.
    pub async fn generate(
        &self,
        request: GenerateRequest,
    ) -> Result<GenerateOutcome, GenerationError> {
        let result = self.run(request).await;

        let label = match &result {
            Ok(outcome) => match outcome.status {
                OutcomeStatus::Processing => "processing",
                OutcomeStatus::Completed => "completed",
            },
            Err(_) => "failed",
        };
        GENERATIONS_TOTAL.with_label_values(&[label]).inc();

        result
    }

    async fn run(&self, request: GenerateRequest) -> Result<GenerateOutcome, GenerationError> {
        let theme = request.theme.trim();
        if theme.is_empty() {
            return Err(GenerationError::InvalidInput(
                "theme must not be empty".to_string(),
            ));
        }
        if !self.provider.is_configured() {
            return Err(GenerationError::NotConfigured);
        }

        info!("Starting generation for theme '{}'", theme);
        if let Some(ref upload) = request.upload {
            debug!("Uploaded image stored at {:?} (not sent to provider)", upload);
        }

        // 1. Image
        let image_url = self
            .resolve_image(theme)
            .await
            .map_err(GenerationError::step(GenerationStep::Image))?;
        match image_url {
            Some(ref url) => info!("Image ready: {}", url),
            None => warn!("Image generation returned no URL"),
        }

        // 2. Lyrics
        let lyrics = self.lyrics_or_fallback(theme).await;

        // 3. Music
        let music = self
            .provider
            .generate_music(theme, &lyrics)
            .await
            .map_err(GenerationError::step(GenerationStep::Music))?;
        if music.music_url.is_none() {
            warn!("Music generation returned no URL");
        }

        // 4. Video
        let task_id = match image_url {
            Some(ref url) => {
                let job = self
                    .provider
                    .generate_video(url, &video_prompt(theme))
                    .await
                    .map_err(GenerationError::step(GenerationStep::Video))?;
                if job.task_id.is_none() {
                    warn!("Video generation returned no task id");
                }
                job.task_id
            }
            None => {
                warn!("Skipping video generation: no image URL");
                None
            }
        };

        // 5. Register
        if let Some(ref id) = task_id {
            self.tasks.set(GenerationTask::new(
                id.clone(),
                theme,
                image_url.clone(),
                music.music_url.clone(),
                lyrics.clone(),
            ))?;
            info!("Registered video task {}", id);
        }

        // 6. Respond
        let status = if task_id.is_some() {
            OutcomeStatus::Processing
        } else {
            OutcomeStatus::Completed
        };

        Ok(GenerateOutcome {
            status,
            task_id,
            music_url: music.music_url,
            image_url,
            lyrics,
        })
    }

    /// Generate the key image and, for asynchronous jobs, poll a bounded
    /// number of times for its URL.
    ///
    /// Falls back to the URL from the initial response when polling runs
    /// out. A query error counts as an attempt without success. A job the
    /// provider reports as failed aborts.
    async fn resolve_image(&self, theme: &str) -> Result<Option<String>, ProviderError> {
        let initial = self.provider.generate_image(&image_prompt(theme)).await?;

        let Some(task_id) = initial.task_id.as_deref() else {
            return Ok(initial.image_url);
        };

        let attempts = self.config.image_poll_attempts;
        for attempt in 1..=attempts {
            sleep(self.config.image_poll_interval()).await;
            IMAGE_POLLS.inc();

            match self.provider.query_image(task_id).await {
                Ok(job) => match job.status {
                    Some(JobStatus::Succeeded) if job.image_url.is_some() => {
                        debug!("Image task {} succeeded on attempt {}", task_id, attempt);
                        return Ok(job.image_url);
                    }
                    Some(JobStatus::Succeeded) => {
                        warn!("Image task {} succeeded without a URL", task_id);
                        break;
                    }
                    Some(JobStatus::Failed) => {
                        return Err(ProviderError::Failed(format!(
                            "Image task {} failed",
                            task_id
                        )));
                    }
                    _ => debug!(
                        "Image task {} still pending ({}/{})",
                        task_id, attempt, attempts
                    ),
                },
                Err(e) => warn!(
                    "Image status query {}/{} for {} failed: {}",
                    attempt, attempts, task_id, e
                ),
            }
        }

        debug!("Image task {} unresolved; using initial response", task_id);
        Ok(initial.image_url)
    }

    async fn lyrics_or_fallback(&self, theme: &str) -> String {
        match self.provider.generate_lyrics(theme).await {
            Ok(lyrics) => lyrics,
            Err(e) => {
                warn!("Lyrics generation failed, using built-in lyrics: {}", e);
                LYRICS_FALLBACKS.inc();
                FALLBACK_LYRICS.to_string()
            }
        }
    }
}
