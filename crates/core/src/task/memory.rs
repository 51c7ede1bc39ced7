//! Process-local task store.

use std::collections::HashMap;
use std::sync::RwLock;

use super::{GenerationTask, TaskError, TaskStore};

/// In-memory [`TaskStore`]. Tasks live for the lifetime of the process.
#[derive(Debug, Default)]
pub struct InMemoryTaskStore {
    tasks: RwLock<HashMap<String, GenerationTask>>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> TaskError {
    TaskError::Storage("task map lock poisoned".to_string())
}

impl TaskStore for InMemoryTaskStore {
    fn get(&self, id: &str) -> Result<Option<GenerationTask>, TaskError> {
        let tasks = self.tasks.read().map_err(poisoned)?;
        Ok(tasks.get(id).cloned())
    }

    fn set(&self, task: GenerationTask) -> Result<(), TaskError> {
        let mut tasks = self.tasks.write().map_err(poisoned)?;
        tasks.insert(task.id.clone(), task);
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<Option<GenerationTask>, TaskError> {
        let mut tasks = self.tasks.write().map_err(poisoned)?;
        Ok(tasks.remove(id))
    }

    fn len(&self) -> Result<usize, TaskError> {
        let tasks = self.tasks.read().map_err(poisoned)?;
        Ok(tasks.len())
    }
}
