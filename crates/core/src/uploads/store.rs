use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tracing::{debug, warn};

use super::UploadError;
use crate::config::UploadConfig;
use crate::metrics::UPLOADS_SWEPT;

/// Saves uploaded images under a single directory.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
    max_bytes: usize,
    retention: Duration,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>, max_bytes: usize, retention: Duration) -> Self {
        Self {
            dir: dir.into(),
            max_bytes,
            retention,
        }
    }

    pub fn from_config(config: &UploadConfig) -> Self {
        Self::new(
            config.dir.clone(),
            config.max_bytes,
            Duration::from_secs(config.retention_secs),
        )
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Write an upload as `<unix_millis>-<uuid>.<ext>` and return its path.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<PathBuf, UploadError> {
        if bytes.is_empty() {
            return Err(UploadError::Empty);
        }
        if bytes.len() > self.max_bytes {
            return Err(UploadError::TooLarge {
                size: bytes.len(),
                max: self.max_bytes,
            });
        }

        tokio::fs::create_dir_all(&self.dir).await?;

        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let name = format!(
            "{}-{}.{}",
            millis,
            uuid::Uuid::new_v4(),
            extension_for(original_name)
        );
        let path = self.dir.join(name);

        tokio::fs::write(&path, bytes).await?;
        debug!("Saved upload {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }

    /// Delete files older than the retention period. Returns how many were removed.
    ///
    /// A missing directory counts as empty. Files that vanish or cannot be
    /// removed mid-sweep are skipped.
    pub async fn sweep(&self) -> Result<usize, UploadError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let now = SystemTime::now();
        let mut removed = 0;

        while let Some(entry) = entries.next_entry().await? {
            let metadata = match entry.metadata().await {
                Ok(m) if m.is_file() => m,
                _ => continue,
            };
            let Ok(modified) = metadata.modified() else {
                continue;
            };
            let age = now.duration_since(modified).unwrap_or_default();
            if age <= self.retention {
                continue;
            }

            match tokio::fs::remove_file(entry.path()).await {
                Ok(()) => removed += 1,
                Err(e) => warn!("Failed to remove {}: {}", entry.path().display(), e),
            }
        }

        if removed > 0 {
            UPLOADS_SWEPT.inc_by(removed as u64);
        }
        Ok(removed)
    }
}

/// Lowercased alphanumeric extension of the client's filename, or `bin`.
fn extension_for(original_name: &str) -> String {
    Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.len() <= 8 && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_else(|| "bin".to_string())
}
