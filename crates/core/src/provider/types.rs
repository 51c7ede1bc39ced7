//! Provider response types.
//!
//! Domain-facing job types are public. The wire schemas mirror what the
//! MiniMax endpoints return and are only read by [`super::normalize`].

use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// Domain types
// ============================================================================

/// Normalized state of an asynchronous provider job.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Queued or still running (also any state the provider adds later).
    Pending,
    Succeeded,
    Failed,
}

/// Result of an image generation request or status query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageJob {
    /// Pollable job id, if the provider runs the request asynchronously.
    pub task_id: Option<String>,
    pub image_url: Option<String>,
    pub status: Option<JobStatus>,
}

/// Result of a music generation request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MusicJob {
    pub music_url: Option<String>,
}

/// Result of a video generation request or status query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoJob {
    pub task_id: Option<String>,
    pub status: JobStatus,
    /// Playable URL, present once the job succeeded.
    pub video_url: Option<String>,
    /// Provider-reported failure reason.
    pub error: Option<String>,
}

impl VideoJob {
    pub fn pending(task_id: Option<String>) -> Self {
        Self {
            task_id,
            status: JobStatus::Pending,
            video_url: None,
            error: None,
        }
    }
}

// ============================================================================
// MiniMax wire schemas (crate-private)
// ============================================================================

/// Status envelope attached to every MiniMax response.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct BaseResp {
    #[serde(default)]
    pub status_code: i64,
    #[serde(default)]
    pub status_msg: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ImageGenerationResponse {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub task_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub data: Option<ImageData>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ImageData {
    #[serde(default)]
    pub image_urls: Option<Vec<String>>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LyricsResponse {
    #[serde(default)]
    pub lyrics: Option<String>,
    #[serde(default)]
    pub data: Option<LyricsData>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct LyricsData {
    #[serde(default)]
    pub lyrics: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MusicResponse {
    #[serde(default)]
    pub data: Option<MusicData>,
    #[serde(default)]
    pub audio_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct MusicData {
    #[serde(default)]
    pub audio_url: Option<String>,
    /// URL when `output_format = "url"`, hex-encoded audio otherwise.
    #[serde(default)]
    pub audio: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VideoGenerationResponse {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub task_id: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VideoStatusResponse {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub task_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub file_id: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub file: Option<FileObject>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FileRetrieveResponse {
    #[serde(default)]
    pub file: Option<FileObject>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct FileObject {
    #[serde(default)]
    pub download_url: Option<String>,
}

/// Error body shapes seen on non-2xx responses.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub base_resp: Option<BaseResp>,
    #[serde(default)]
    pub error: Option<ErrorDetail>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorDetail {
    #[serde(default)]
    pub message: Option<String>,
}

/// MiniMax returns some ids as JSON numbers and others as strings.
fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_file_id_becomes_string() {
        let resp: VideoStatusResponse = serde_json::from_value(json!({
            "task_id": "106916112212032",
            "status": "Success",
            "file_id": 205258526306433_u64
        }))
        .unwrap();
        assert_eq!(resp.file_id.as_deref(), Some("205258526306433"));
        assert_eq!(resp.task_id.as_deref(), Some("106916112212032"));
    }

    #[test]
    fn test_empty_task_id_is_none() {
        let resp: VideoGenerationResponse =
            serde_json::from_value(json!({ "task_id": "" })).unwrap();
        assert!(resp.task_id.is_none());
    }
}
