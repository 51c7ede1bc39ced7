//! Testing utilities and mock implementations.
//!
//! This module provides a scripted [`MockMediaProvider`] so the generation
//! pipeline and the HTTP layer can be tested without network access.
//!
//! # Example
//!
//! ```rust,ignore
//! use lyricreel_core::testing::{fixtures, MockMediaProvider};
//!
//! let provider = MockMediaProvider::new();
//! provider.set_video_status(fixtures::video_succeeded("task-1", "https://cdn/v.mp4")).await;
//!
//! // Use in AppState...
//! ```

mod mock_provider;

pub use mock_provider::{MockMediaProvider, MockOperation, RecordedCall};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::provider::{ImageJob, JobStatus, VideoJob};
    use crate::task::GenerationTask;

    /// An image job that still needs polling.
    pub fn image_pending(task_id: &str) -> ImageJob {
        ImageJob {
            task_id: Some(task_id.to_string()),
            image_url: None,
            status: Some(JobStatus::Pending),
        }
    }

    /// A finished image job.
    pub fn image_succeeded(task_id: &str, url: &str) -> ImageJob {
        ImageJob {
            task_id: Some(task_id.to_string()),
            image_url: Some(url.to_string()),
            status: Some(JobStatus::Succeeded),
        }
    }

    /// A finished video job.
    pub fn video_succeeded(task_id: &str, url: &str) -> VideoJob {
        VideoJob {
            task_id: Some(task_id.to_string()),
            status: JobStatus::Succeeded,
            video_url: Some(url.to_string()),
            error: None,
        }
    }

    /// A failed video job.
    pub fn video_failed(task_id: &str, error: &str) -> VideoJob {
        VideoJob {
            task_id: Some(task_id.to_string()),
            status: JobStatus::Failed,
            video_url: None,
            error: Some(error.to_string()),
        }
    }

    /// A processing task with mock media attached.
    pub fn processing_task(id: &str, theme: &str) -> GenerationTask {
        GenerationTask::new(
            id,
            theme,
            Some("https://mock.example/image.jpeg".to_string()),
            Some("https://mock.example/music.mp3".to_string()),
            "[Verse]\nfixture lyrics",
        )
    }
}
