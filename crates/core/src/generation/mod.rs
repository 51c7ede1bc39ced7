//! Generation orchestration.
//!
//! A submission runs four dependent provider calls in order:
//! - **Image**: generated from the theme, briefly polled when asynchronous
//! - **Lyrics**: falls back to built-in lyrics on any failure
//! - **Music**: synthesized from the theme and lyrics
//! - **Video**: started from the image; completion is polled separately
//!   through [`StatusChecker`]

mod lyrics;
mod orchestrator;
mod status;
mod types;

pub use lyrics::{image_prompt, video_prompt, FALLBACK_LYRICS};
pub use orchestrator::GenerationOrchestrator;
pub use status::{merge_media, StatusChecker};
pub use types::{GenerateOutcome, GenerateRequest, GenerationStep, OutcomeStatus, StatusReport};

use thiserror::Error;

use crate::provider::ProviderError;
use crate::task::TaskError;

/// Errors surfaced by generation and status checks.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Rejected before any provider call.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No provider API key.
    #[error("MINIMAX_API_KEY is not configured")]
    NotConfigured,

    /// A required step failed; the whole submission is aborted.
    #[error("{step} failed: {source}")]
    Step {
        step: GenerationStep,
        #[source]
        source: ProviderError,
    },

    /// Unknown task id.
    #[error("Task not found: {0}")]
    TaskNotFound(String),

    /// Provider error while checking task status.
    #[error("Status query failed: {0}")]
    Provider(#[from] ProviderError),

    /// Task registry error.
    #[error(transparent)]
    Task(#[from] TaskError),
}

impl GenerationError {
    pub(crate) fn step(step: GenerationStep) -> impl FnOnce(ProviderError) -> Self {
        move |source| GenerationError::Step { step, source }
    }
}
