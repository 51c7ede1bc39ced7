//! Generation task data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TaskError;

/// Lifecycle of a generation task.
///
/// The only transitions are `Processing -> Success` and
/// `Processing -> Failed`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Processing,
    Success,
    Failed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Processing => "processing",
            TaskStatus::Success => "success",
            TaskStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A video generation job plus the metadata gathered while creating it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationTask {
    /// Provider-issued video task id.
    pub id: String,
    pub theme: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub music_url: Option<String>,
    pub lyrics: String,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Set once the task succeeds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    /// Set once the task fails.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerationTask {
    /// Create a task in the `Processing` state.
    pub fn new(
        id: impl Into<String>,
        theme: impl Into<String>,
        image_url: Option<String>,
        music_url: Option<String>,
        lyrics: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            theme: theme.into(),
            image_url,
            music_url,
            lyrics: lyrics.into(),
            status: TaskStatus::Processing,
            created_at: now,
            updated_at: now,
            video_url: None,
            error: None,
        }
    }

    /// Move to `Success` with the final video URL.
    ///
    /// Returns `Ok(false)` when the task already succeeded with the same URL.
    pub fn mark_success(&mut self, video_url: impl Into<String>) -> Result<bool, TaskError> {
        let video_url = video_url.into();
        match self.status {
            TaskStatus::Processing => {
                self.status = TaskStatus::Success;
                self.video_url = Some(video_url);
                self.updated_at = Utc::now();
                Ok(true)
            }
            TaskStatus::Success if self.video_url.as_deref() == Some(video_url.as_str()) => {
                Ok(false)
            }
            _ => Err(self.invalid(TaskStatus::Success)),
        }
    }

    /// Move to `Failed` with a reason.
    ///
    /// Returns `Ok(false)` when the task had already failed.
    pub fn mark_failed(&mut self, error: impl Into<String>) -> Result<bool, TaskError> {
        match self.status {
            TaskStatus::Processing => {
                self.status = TaskStatus::Failed;
                self.error = Some(error.into());
                self.updated_at = Utc::now();
                Ok(true)
            }
            TaskStatus::Failed => Ok(false),
            TaskStatus::Success => Err(self.invalid(TaskStatus::Failed)),
        }
    }

    fn invalid(&self, to: TaskStatus) -> TaskError {
        TaskError::InvalidTransition {
            task_id: self.id.clone(),
            from: self.status.to_string(),
            to: to.to_string(),
        }
    }
}
