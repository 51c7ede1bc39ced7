use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::api::{validate_submission, GenerationClient};
use super::progress::{ProgressStep, ProgressTracker, Stage};
use super::types::{GenerateReply, ImageUpload, StatusReply};
use super::ClientError;
use crate::config::ClientConfig;

/// Status polling bounds for [`run_submission`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOptions {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self::from(&ClientConfig::default())
    }
}

impl From<&ClientConfig> for PollOptions {
    fn from(config: &ClientConfig) -> Self {
        Self {
            interval: Duration::from_millis(config.poll_interval_ms),
            max_attempts: config.max_poll_attempts,
        }
    }
}

/// Result of a finished submission.
#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    pub generation: GenerateReply,
    /// Final video URL. `None` when the server finished without a video task.
    pub video_url: Option<String>,
    pub steps: Vec<ProgressStep>,
}

/// Submit an image and theme, then poll until the video is ready.
///
/// `on_progress` is called after every step change. On any error, steps
/// still in flight are moved to `error` and reported once more before the
/// error is returned.
pub async fn run_submission<F>(
    client: &GenerationClient,
    image: &ImageUpload,
    theme: &str,
    options: PollOptions,
    cancel: &CancellationToken,
    mut on_progress: F,
) -> Result<SubmissionOutcome, ClientError>
where
    F: FnMut(&[ProgressStep]),
{
    validate_submission(Some(&image.bytes), theme)?;

    let mut tracker = ProgressTracker::new();
    let result = tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(ClientError::Cancelled),
        result = drive(client, image, theme, options, &mut tracker, &mut on_progress) => result,
    };

    match result {
        Ok((generation, video_url)) => Ok(SubmissionOutcome {
            generation,
            video_url,
            steps: tracker.steps().to_vec(),
        }),
        Err(e) => {
            tracker.fail_in_flight();
            on_progress(tracker.steps());
            Err(e)
        }
    }
}

async fn drive<F>(
    client: &GenerationClient,
    image: &ImageUpload,
    theme: &str,
    options: PollOptions,
    tracker: &mut ProgressTracker,
    on_progress: &mut F,
) -> Result<(GenerateReply, Option<String>), ClientError>
where
    F: FnMut(&[ProgressStep]),
{
    tracker.start(Stage::Upload);
    on_progress(tracker.steps());

    let generation = client.submit(image, theme).await?;

    tracker.complete(Stage::Upload);
    tracker.complete(Stage::Music);
    on_progress(tracker.steps());

    let Some(task_id) = generation.task_id.clone() else {
        info!("Generation completed without a video task");
        tracker.complete(Stage::Video);
        tracker.complete(Stage::Merge);
        on_progress(tracker.steps());
        return Ok((generation, None));
    };

    tracker.start(Stage::Video);
    on_progress(tracker.steps());

    for attempt in 1..=options.max_attempts {
        tokio::time::sleep(options.interval).await;

        match client.status(&task_id).await? {
            StatusReply::Success { video_url } => {
                tracker.complete(Stage::Video);
                tracker.complete(Stage::Merge);
                on_progress(tracker.steps());
                return Ok((generation, Some(video_url)));
            }
            StatusReply::Failed { error } => return Err(ClientError::Failed(error)),
            StatusReply::Processing => {
                debug!(
                    "Task {} processing (check {}/{})",
                    task_id, attempt, options.max_attempts
                );
            }
        }
    }

    Err(ClientError::TimedOut {
        attempts: options.max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::StepStatus;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fast() -> PollOptions {
        PollOptions {
            interval: Duration::from_millis(5),
            max_attempts: 3,
        }
    }

    fn image() -> ImageUpload {
        ImageUpload::new("cover.png", b"png-bytes".to_vec())
    }

    async fn server_with_task(status_body: serde_json::Value) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "processing",
                "taskId": "task-1",
                "musicUrl": "https://cdn/m.mp3",
                "imageUrl": "https://cdn/i.jpeg",
                "lyrics": "[Verse]"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/status/task-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(status_body))
            .mount(&server)
            .await;
        server
    }

    fn statuses(steps: &[ProgressStep]) -> Vec<StepStatus> {
        steps.iter().map(|s| s.status).collect()
    }

    #[tokio::test]
    async fn test_success_completes_all_steps() {
        let server =
            server_with_task(json!({"status": "success", "videoUrl": "https://cdn/v.mp4"})).await;
        let client = GenerationClient::new(server.uri()).unwrap();

        let mut history = Vec::new();
        let outcome = run_submission(
            &client,
            &image(),
            "ocean",
            fast(),
            &CancellationToken::new(),
            |steps| history.push(statuses(steps)),
        )
        .await
        .unwrap();

        assert_eq!(outcome.video_url.as_deref(), Some("https://cdn/v.mp4"));
        assert_eq!(outcome.generation.task_id.as_deref(), Some("task-1"));
        assert_eq!(statuses(&outcome.steps), vec![StepStatus::Completed; 4]);

        use StepStatus::*;
        assert_eq!(
            history,
            vec![
                vec![Processing, Pending, Pending, Pending],
                vec![Completed, Completed, Pending, Pending],
                vec![Completed, Completed, Processing, Pending],
                vec![Completed, Completed, Completed, Completed],
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_task_marks_video_error() {
        let server = server_with_task(json!({"status": "failed", "error": "content policy"})).await;
        let client = GenerationClient::new(server.uri()).unwrap();

        let mut last = Vec::new();
        let err = run_submission(
            &client,
            &image(),
            "ocean",
            fast(),
            &CancellationToken::new(),
            |steps| last = statuses(steps),
        )
        .await
        .unwrap_err();

        assert_eq!(err.to_string(), "content policy");
        use StepStatus::*;
        assert_eq!(last, vec![Completed, Completed, Error, Pending]);
    }

    #[tokio::test]
    async fn test_polling_is_bounded() {
        let server = server_with_task(json!({"status": "processing"})).await;
        let client = GenerationClient::new(server.uri()).unwrap();

        let err = run_submission(
            &client,
            &image(),
            "ocean",
            fast(),
            &CancellationToken::new(),
            |_| {},
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ClientError::TimedOut { attempts: 3 }));
        let polls = server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .filter(|r| r.url.path() == "/api/status/task-1")
            .count();
        assert_eq!(polls, 3);
    }

    #[tokio::test]
    async fn test_cancel_stops_polling() {
        let server = server_with_task(json!({"status": "processing"})).await;
        let client = GenerationClient::new(server.uri()).unwrap();
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let mut last = Vec::new();
        let err = run_submission(
            &client,
            &image(),
            "ocean",
            PollOptions {
                interval: Duration::from_millis(10),
                max_attempts: u32::MAX,
            },
            &cancel,
            |steps| last = statuses(steps),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ClientError::Cancelled));
        use StepStatus::*;
        assert_eq!(last, vec![Completed, Completed, Error, Pending]);
    }

    #[tokio::test]
    async fn test_invalid_input_makes_no_requests() {
        let server = MockServer::start().await;
        let client = GenerationClient::new(server.uri()).unwrap();

        let mut called = false;
        let err = run_submission(
            &client,
            &image(),
            "  ",
            fast(),
            &CancellationToken::new(),
            |_| called = true,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ClientError::Invalid(_)));
        assert!(!called);
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_submit_failure_marks_upload_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_json(json!({"error": "Music generation failed"})),
            )
            .mount(&server)
            .await;
        let client = GenerationClient::new(server.uri()).unwrap();

        let mut last = Vec::new();
        let err = run_submission(
            &client,
            &image(),
            "ocean",
            fast(),
            &CancellationToken::new(),
            |steps| last = statuses(steps),
        )
        .await
        .unwrap_err();

        assert!(err.to_string().contains("Music generation failed"));
        use StepStatus::*;
        assert_eq!(last, vec![Error, Pending, Pending, Pending]);
    }

    #[tokio::test]
    async fn test_completed_without_task_skips_polling() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "completed",
                "lyrics": "[Verse]"
            })))
            .mount(&server)
            .await;
        let client = GenerationClient::new(server.uri()).unwrap();

        let outcome = run_submission(
            &client,
            &image(),
            "ocean",
            fast(),
            &CancellationToken::new(),
            |_| {},
        )
        .await
        .unwrap();

        assert!(outcome.video_url.is_none());
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }
}
