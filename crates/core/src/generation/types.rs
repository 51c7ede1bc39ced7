//! Request and result types for generation.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A user submission.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub theme: String,
    /// Where the uploaded image was stored, if one was received.
    ///
    /// The image itself is not sent to the provider: a fresh image is
    /// generated from the theme instead.
    pub upload: Option<PathBuf>,
}

impl GenerateRequest {
    pub fn new(theme: impl Into<String>) -> Self {
        Self {
            theme: theme.into(),
            upload: None,
        }
    }

    pub fn with_upload(mut self, path: PathBuf) -> Self {
        self.upload = Some(path);
        self
    }
}

/// Overall status returned right after a submission.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// A video task was started; poll its status.
    Processing,
    /// No video task was started; nothing left to poll.
    Completed,
}

/// Immediate result of a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOutcome {
    pub status: OutcomeStatus,
    pub task_id: Option<String>,
    pub music_url: Option<String>,
    pub image_url: Option<String>,
    pub lyrics: String,
}

/// Result of a status check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusReport {
    Processing,
    Success { video_url: String },
    Failed { error: String },
}

/// Provider step of a submission, used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStep {
    Image,
    Music,
    Video,
}

impl fmt::Display for GenerationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GenerationStep::Image => "Image generation",
            GenerationStep::Music => "Music generation",
            GenerationStep::Video => "Video generation",
        };
        f.write_str(name)
    }
}
