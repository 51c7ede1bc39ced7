//! Mock media provider for testing.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::provider::{ImageJob, JobStatus, MediaProvider, MusicJob, ProviderError, VideoJob};

/// Provider operations the mock can record and fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOperation {
    GenerateImage,
    QueryImage,
    GenerateLyrics,
    GenerateMusic,
    GenerateVideo,
    QueryVideo,
}

/// A recorded provider call for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// Which operation was called.
    pub operation: MockOperation,
    /// The main argument. Music records `"{theme}\n{lyrics}"`.
    pub argument: String,
    /// When the call was made. Follows paused tokio time.
    pub at: Instant,
}

/// Mock implementation of the MediaProvider trait.
///
/// Every operation succeeds with a default response until told otherwise:
/// - Configure responses per operation
/// - Queue image poll results
/// - Record calls (including failed ones) for assertions
/// - Fail an operation until cleared
///
/// # Example
///
/// ```rust,ignore
/// use lyricreel_core::testing::{MockMediaProvider, MockOperation};
///
/// let provider = MockMediaProvider::new();
/// provider.fail(MockOperation::GenerateLyrics, "upstream 500").await;
///
/// // ... run a generation ...
///
/// assert_eq!(provider.count(MockOperation::GenerateLyrics).await, 1);
/// ```
#[derive(Debug)]
pub struct MockMediaProvider {
    configured: AtomicBool,
    lyrics: Arc<RwLock<String>>,
    image_job: Arc<RwLock<ImageJob>>,
    image_polls: Arc<RwLock<VecDeque<ImageJob>>>,
    music_job: Arc<RwLock<MusicJob>>,
    video_task_id: Arc<RwLock<Option<String>>>,
    video_status: Arc<RwLock<Option<VideoJob>>>,
    failures: Arc<RwLock<HashMap<MockOperation, String>>>,
    calls: Arc<RwLock<Vec<RecordedCall>>>,
}

impl Default for MockMediaProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMediaProvider {
    pub const DEFAULT_IMAGE_URL: &'static str = "https://mock.example/image.jpeg";
    pub const DEFAULT_MUSIC_URL: &'static str = "https://mock.example/music.mp3";
    pub const DEFAULT_VIDEO_TASK_ID: &'static str = "mock-video-task";
    pub const DEFAULT_LYRICS: &'static str =
        "[Verse]\nMock lyrics line\n[Chorus]\nMock chorus line";

    /// Create a configured mock with default responses.
    ///
    /// The default image job has no task id, so no image polling happens.
    pub fn new() -> Self {
        Self {
            configured: AtomicBool::new(true),
            lyrics: Arc::new(RwLock::new(Self::DEFAULT_LYRICS.to_string())),
            image_job: Arc::new(RwLock::new(ImageJob {
                task_id: None,
                image_url: Some(Self::DEFAULT_IMAGE_URL.to_string()),
                status: None,
            })),
            image_polls: Arc::new(RwLock::new(VecDeque::new())),
            music_job: Arc::new(RwLock::new(MusicJob {
                music_url: Some(Self::DEFAULT_MUSIC_URL.to_string()),
            })),
            video_task_id: Arc::new(RwLock::new(Some(Self::DEFAULT_VIDEO_TASK_ID.to_string()))),
            video_status: Arc::new(RwLock::new(None)),
            failures: Arc::new(RwLock::new(HashMap::new())),
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Toggle whether the mock reports credentials.
    pub fn set_configured(&self, configured: bool) {
        self.configured.store(configured, Ordering::SeqCst);
    }

    /// Set the lyrics returned by `generate_lyrics`.
    pub async fn set_lyrics(&self, lyrics: &str) {
        *self.lyrics.write().await = lyrics.to_string();
    }

    /// Set the job returned by `generate_image`.
    pub async fn set_image_job(&self, job: ImageJob) {
        *self.image_job.write().await = job;
    }

    /// Queue results for successive `query_image` calls.
    ///
    /// Once the queue is drained every query reports a pending job.
    pub async fn queue_image_polls(&self, jobs: Vec<ImageJob>) {
        self.image_polls.write().await.extend(jobs);
    }

    /// Set the job returned by `generate_music`.
    pub async fn set_music_job(&self, job: MusicJob) {
        *self.music_job.write().await = job;
    }

    /// Set the task id returned by `generate_video`.
    pub async fn set_video_task_id(&self, task_id: Option<String>) {
        *self.video_task_id.write().await = task_id;
    }

    /// Set the job returned by `query_video`. Defaults to pending.
    pub async fn set_video_status(&self, job: VideoJob) {
        *self.video_status.write().await = Some(job);
    }

    /// Make an operation fail with an API error until cleared.
    pub async fn fail(&self, operation: MockOperation, message: &str) {
        self.failures
            .write()
            .await
            .insert(operation, message.to_string());
    }

    /// Stop failing an operation.
    pub async fn clear_failure(&self, operation: MockOperation) {
        self.failures.write().await.remove(&operation);
    }

    /// Get recorded calls in order.
    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.read().await.clone()
    }

    /// Number of recorded calls to an operation.
    pub async fn count(&self, operation: MockOperation) -> usize {
        self.calls
            .read()
            .await
            .iter()
            .filter(|c| c.operation == operation)
            .count()
    }

    /// Clear recorded calls.
    pub async fn clear_calls(&self) {
        self.calls.write().await.clear();
    }

    async fn record(
        &self,
        operation: MockOperation,
        argument: String,
    ) -> Result<(), ProviderError> {
        self.calls.write().await.push(RecordedCall {
            operation,
            argument,
            at: Instant::now(),
        });

        match self.failures.read().await.get(&operation) {
            Some(message) => Err(ProviderError::Api {
                status: 500,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl MediaProvider for MockMediaProvider {
    fn is_configured(&self) -> bool {
        self.configured.load(Ordering::SeqCst)
    }

    async fn generate_image(&self, prompt: &str) -> Result<ImageJob, ProviderError> {
        self.record(MockOperation::GenerateImage, prompt.to_string())
            .await?;
        Ok(self.image_job.read().await.clone())
    }

    async fn query_image(&self, task_id: &str) -> Result<ImageJob, ProviderError> {
        self.record(MockOperation::QueryImage, task_id.to_string())
            .await?;
        Ok(self
            .image_polls
            .write()
            .await
            .pop_front()
            .unwrap_or_else(|| ImageJob {
                task_id: Some(task_id.to_string()),
                image_url: None,
                status: Some(JobStatus::Pending),
            }))
    }

    async fn generate_lyrics(&self, theme: &str) -> Result<String, ProviderError> {
        self.record(MockOperation::GenerateLyrics, theme.to_string())
            .await?;
        Ok(self.lyrics.read().await.clone())
    }

    async fn generate_music(&self, theme: &str, lyrics: &str) -> Result<MusicJob, ProviderError> {
        self.record(MockOperation::GenerateMusic, format!("{}\n{}", theme, lyrics))
            .await?;
        Ok(self.music_job.read().await.clone())
    }

    async fn generate_video(
        &self,
        image_url: &str,
        _prompt: &str,
    ) -> Result<VideoJob, ProviderError> {
        self.record(MockOperation::GenerateVideo, image_url.to_string())
            .await?;
        let task_id = self.video_task_id.read().await.clone();
        Ok(VideoJob {
            task_id,
            status: JobStatus::Pending,
            video_url: None,
            error: None,
        })
    }

    async fn query_video(&self, task_id: &str) -> Result<VideoJob, ProviderError> {
        self.record(MockOperation::QueryVideo, task_id.to_string())
            .await?;
        Ok(self
            .video_status
            .read()
            .await
            .clone()
            .unwrap_or_else(|| VideoJob::pending(Some(task_id.to_string()))))
    }
}
