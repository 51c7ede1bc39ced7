//! Generation task registry.
//!
//! Maps provider-issued video task ids to the metadata gathered while the
//! task was created, plus its current status.

mod memory;
mod store;
mod types;

pub use memory::InMemoryTaskStore;
pub use store::{TaskError, TaskStore};
pub use types::{GenerationTask, TaskStatus};
