//! Client side of the generation service.
//!
//! [`GenerationClient`] speaks the HTTP API, [`ProgressTracker`] holds the
//! four-stage progress indicator, and [`run_submission`] drives both through
//! a full submit-and-poll cycle.

mod api;
mod progress;
mod runner;
mod types;

pub use api::{validate_submission, GenerationClient, MAX_IMAGE_BYTES};
pub use progress::{ProgressStep, ProgressTracker, Stage, StepStatus};
pub use runner::{run_submission, PollOptions, SubmissionOutcome};
pub use types::{GenerateReply, HealthReply, ImageUpload, StatusReply};

use thiserror::Error;

/// Errors surfaced to the submitting user.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Rejected locally before any request was made.
    #[error("{0}")]
    Invalid(String),

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response from the service.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// The service reported the video task as failed.
    #[error("{0}")]
    Failed(String),

    #[error("Cancelled")]
    Cancelled,

    #[error("Gave up after {attempts} status checks")]
    TimedOut { attempts: u32 },
}
