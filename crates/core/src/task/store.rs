//! Task storage trait and errors.

use thiserror::Error;

use crate::task::GenerationTask;

/// Error type for task operations.
#[derive(Debug, Error)]
pub enum TaskError {
    /// Status change not allowed from the current status.
    #[error("Cannot move task {task_id} from {from} to {to}")]
    InvalidTransition {
        task_id: String,
        from: String,
        to: String,
    },
    /// Backend failure.
    #[error("Task storage error: {0}")]
    Storage(String),
}

/// Trait for task storage backends.
///
/// Injected into the orchestrator and the status checker so the in-memory
/// map can be swapped for a persistent backend without touching call sites.
pub trait TaskStore: Send + Sync {
    /// Get a task by id.
    fn get(&self, id: &str) -> Result<Option<GenerationTask>, TaskError>;

    /// Insert or replace a task.
    fn set(&self, task: GenerationTask) -> Result<(), TaskError>;

    /// Remove a task. Returns the removed task if it existed.
    fn delete(&self, id: &str) -> Result<Option<GenerationTask>, TaskError>;

    /// Number of stored tasks.
    fn len(&self) -> Result<usize, TaskError>;

    fn is_empty(&self) -> Result<bool, TaskError> {
        Ok(self.len()? == 0)
    }
}
