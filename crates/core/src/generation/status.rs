//! Video task status checks.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::types::StatusReport;
use super::GenerationError;
use crate::metrics::TASK_TRANSITIONS;
use crate::provider::{JobStatus, MediaProvider, ProviderError};
use crate::task::{TaskStatus, TaskStore};

/// Combine the generated video with its music track.
///
/// No muxing is performed: the video URL is returned unchanged and the
/// music stays available separately.
pub fn merge_media(video_url: &str, _music_url: Option<&str>) -> String {
    video_url.to_string()
}

/// Re-queries the provider for registered tasks and records terminal states.
pub struct StatusChecker {
    provider: Arc<dyn MediaProvider>,
    tasks: Arc<dyn TaskStore>,
}

impl StatusChecker {
    pub fn new(provider: Arc<dyn MediaProvider>, tasks: Arc<dyn TaskStore>) -> Self {
        Self { provider, tasks }
    }

    /// Check a task.
    ///
    /// Terminal tasks are answered from the store without another provider
    /// query, so repeated polls after success return the same URL.
    pub async fn check(&self, task_id: &str) -> Result<StatusReport, GenerationError> {
        let mut task = self
            .tasks
            .get(task_id)?
            .ok_or_else(|| GenerationError::TaskNotFound(task_id.to_string()))?;

        match task.status {
            TaskStatus::Success => {
                return Ok(StatusReport::Success {
                    video_url: task.video_url.clone().unwrap_or_default(),
                })
            }
            TaskStatus::Failed => {
                return Ok(StatusReport::Failed {
                    error: task
                        .error
                        .clone()
                        .unwrap_or_else(|| "Video generation failed".to_string()),
                })
            }
            TaskStatus::Processing => {}
        }

        let job = self.provider.query_video(task_id).await?;

        match job.status {
            JobStatus::Succeeded => {
                let video_url = job.video_url.ok_or_else(|| {
                    ProviderError::Parse(format!("Task {} succeeded without a video URL", task_id))
                })?;
                let final_url = merge_media(&video_url, task.music_url.as_deref());

                if task.mark_success(final_url.clone())? {
                    self.tasks.set(task)?;
                    TASK_TRANSITIONS
                        .with_label_values(&[TaskStatus::Success.as_str()])
                        .inc();
                    info!("Task {} succeeded: {}", task_id, final_url);
                }

                Ok(StatusReport::Success {
                    video_url: final_url,
                })
            }
            JobStatus::Failed => {
                let reason = job
                    .error
                    .unwrap_or_else(|| "Video generation failed".to_string());

                if task.mark_failed(reason.clone())? {
                    self.tasks.set(task)?;
                    TASK_TRANSITIONS
                        .with_label_values(&[TaskStatus::Failed.as_str()])
                        .inc();
                    warn!("Task {} failed: {}", task_id, reason);
                }

                Ok(StatusReport::Failed { error: reason })
            }
            JobStatus::Pending => {
                debug!("Task {} still processing", task_id);
                Ok(StatusReport::Processing)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::VideoJob;
    use crate::task::InMemoryTaskStore;
    use crate::testing::{fixtures, MockMediaProvider, MockOperation};

    fn setup() -> (Arc<MockMediaProvider>, Arc<InMemoryTaskStore>, StatusChecker) {
        let provider = Arc::new(MockMediaProvider::new());
        let tasks = Arc::new(InMemoryTaskStore::new());
        tasks.set(fixtures::processing_task("vid-1", "theme")).unwrap();
        let checker = StatusChecker::new(provider.clone(), tasks.clone());
        (provider, tasks, checker)
    }

    fn succeeded(url: &str) -> VideoJob {
        fixtures::video_succeeded("vid-1", url)
    }

    #[test]
    fn test_merge_is_passthrough() {
        assert_eq!(
            merge_media("https://cdn.example/v.mp4", Some("https://cdn.example/a.mp3")),
            "https://cdn.example/v.mp4"
        );
    }

    #[tokio::test]
    async fn test_unknown_task_is_not_found() {
        let (provider, _tasks, checker) = setup();

        let err = checker.check("never-registered").await.unwrap_err();
        assert!(matches!(err, GenerationError::TaskNotFound(ref id) if id == "never-registered"));
        assert_eq!(provider.count(MockOperation::QueryVideo).await, 0);
    }

    #[tokio::test]
    async fn test_pending_leaves_task_unchanged() {
        let (_provider, tasks, checker) = setup();
        let before = tasks.get("vid-1").unwrap().unwrap();

        let report = checker.check("vid-1").await.unwrap();
        assert_eq!(report, StatusReport::Processing);
        assert_eq!(tasks.get("vid-1").unwrap().unwrap(), before);
    }

    #[tokio::test]
    async fn test_success_is_stored_and_idempotent() {
        let (provider, tasks, checker) = setup();
        provider
            .set_video_status(succeeded("https://cdn.example/v.mp4"))
            .await;

        let first = checker.check("vid-1").await.unwrap();
        assert_eq!(
            first,
            StatusReport::Success {
                video_url: "https://cdn.example/v.mp4".to_string()
            }
        );

        let stored = tasks.get("vid-1").unwrap().unwrap();
        assert_eq!(stored.status, TaskStatus::Success);
        assert_eq!(stored.video_url.as_deref(), Some("https://cdn.example/v.mp4"));

        // Provider now reports something else; the stored result wins.
        provider
            .set_video_status(succeeded("https://cdn.example/other.mp4"))
            .await;
        let second = checker.check("vid-1").await.unwrap();
        assert_eq!(second, first);
        assert_eq!(provider.count(MockOperation::QueryVideo).await, 1);
        assert_eq!(tasks.get("vid-1").unwrap().unwrap(), stored);
    }

    #[tokio::test]
    async fn test_failed_is_stored() {
        let (provider, tasks, checker) = setup();
        provider
            .set_video_status(fixtures::video_failed("vid-1", "content policy"))
            .await;

        let report = checker.check("vid-1").await.unwrap();
        assert_eq!(
            report,
            StatusReport::Failed {
                error: "content policy".to_string()
            }
        );
        assert_eq!(
            tasks.get("vid-1").unwrap().unwrap().status,
            TaskStatus::Failed
        );

        // Later polls do not flip a failed task.
        provider
            .set_video_status(succeeded("https://cdn.example/v.mp4"))
            .await;
        assert_eq!(checker.check("vid-1").await.unwrap(), report);
    }

    #[tokio::test]
    async fn test_provider_error_propagates() {
        let (provider, tasks, checker) = setup();
        provider.fail(MockOperation::QueryVideo, "gateway timeout").await;

        let err = checker.check("vid-1").await.unwrap_err();
        assert!(matches!(err, GenerationError::Provider(_)));
        assert!(err.to_string().contains("gateway timeout"));
        assert_eq!(
            tasks.get("vid-1").unwrap().unwrap().status,
            TaskStatus::Processing
        );
    }

    #[tokio::test]
    async fn test_success_without_url_is_error() {
        let (provider, tasks, checker) = setup();
        provider
            .set_video_status(VideoJob {
                task_id: Some("vid-1".to_string()),
                status: JobStatus::Succeeded,
                video_url: None,
                error: None,
            })
            .await;

        assert!(checker.check("vid-1").await.is_err());
        assert_eq!(
            tasks.get("vid-1").unwrap().unwrap().status,
            TaskStatus::Processing
        );
    }
}
