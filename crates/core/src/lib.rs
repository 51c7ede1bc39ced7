pub mod client;
pub mod config;
pub mod generation;
pub mod metrics;
pub mod provider;
pub mod task;
pub mod testing;
pub mod uploads;

pub use client::{
    run_submission, validate_submission, ClientError, GenerationClient, ImageUpload, PollOptions,
    ProgressStep, ProgressTracker, Stage, StepStatus,
};
pub use config::{
    load_config, load_config_from_str, load_config_strict, validate_config, ClientConfig, Config,
    ConfigError, SanitizedConfig,
};
pub use generation::{
    GenerateOutcome, GenerateRequest, GenerationError, GenerationOrchestrator, OutcomeStatus,
    StatusChecker, StatusReport,
};
pub use provider::{MediaProvider, MiniMaxClient, ProviderError};
pub use task::{GenerationTask, InMemoryTaskStore, TaskError, TaskStatus, TaskStore};
pub use uploads::{spawn_sweeper, UploadError, UploadStore};
