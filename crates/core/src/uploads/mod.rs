//! Uploaded image storage with time-based cleanup.

mod store;
mod sweeper;

pub use store::UploadStore;
pub use sweeper::spawn_sweeper;

use thiserror::Error;

/// Errors from saving or sweeping uploads.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Upload is empty")]
    Empty,

    #[error("Upload of {size} bytes exceeds the {max} byte limit")]
    TooLarge { size: usize, max: usize },

    #[error("Upload IO error: {0}")]
    Io(#[from] std::io::Error),
}
