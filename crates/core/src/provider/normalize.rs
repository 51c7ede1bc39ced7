//! Maps MiniMax response shapes onto domain job types.
//!
//! The provider is inconsistent about where it puts URLs, ids and states.
//! Every fallback lives here as an ordered list of candidate fields; the
//! first present, non-empty candidate wins.

use super::types::{
    ErrorBody, FileRetrieveResponse, ImageGenerationResponse, ImageJob, JobStatus, LyricsResponse,
    MusicJob, MusicResponse, VideoGenerationResponse, VideoJob, VideoStatusResponse,
};

/// Message used when an error body carries nothing readable.
pub const FALLBACK_ERROR_MESSAGE: &str = "Provider request failed";

/// Returns the first candidate that is present and not blank.
fn first_present<'a, I>(candidates: I) -> Option<String>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    candidates
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

fn looks_like_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Job state rule: `Success | success | completed` succeed,
/// `Fail | failed | error` fail, anything else (Queueing, Preparing,
/// Processing, unknown) is still pending.
pub fn job_status(raw: &str) -> JobStatus {
    match raw.trim().to_ascii_lowercase().as_str() {
        "success" | "succeeded" | "completed" => JobStatus::Succeeded,
        "fail" | "failed" | "error" => JobStatus::Failed,
        _ => JobStatus::Pending,
    }
}

/// Image URL rule: `data.image_urls[0]`, `data.url`, `url`, `image_url`.
///
/// Task id rule: `task_id` only.
pub(crate) fn image_job(resp: &ImageGenerationResponse) -> ImageJob {
    let data = resp.data.as_ref();
    let image_url = first_present([
        data.and_then(|d| d.image_urls.as_deref())
            .and_then(|urls| urls.first())
            .map(String::as_str),
        data.and_then(|d| d.url.as_deref()),
        resp.url.as_deref(),
        resp.image_url.as_deref(),
    ]);

    ImageJob {
        task_id: first_present([resp.task_id.as_deref()]),
        image_url,
        status: resp.status.as_deref().map(job_status),
    }
}

/// Lyrics rule: `lyrics`, `data.lyrics`, `text`.
pub(crate) fn lyrics(resp: &LyricsResponse) -> Option<String> {
    first_present([
        resp.lyrics.as_deref(),
        resp.data.as_ref().and_then(|d| d.lyrics.as_deref()),
        resp.text.as_deref(),
    ])
}

/// Music URL rule: `data.audio_url`, `data.audio` (only when it is a URL,
/// not hex audio), `audio_url`.
pub(crate) fn music_job(resp: &MusicResponse) -> MusicJob {
    let data = resp.data.as_ref();
    let music_url = first_present([
        data.and_then(|d| d.audio_url.as_deref()),
        data.and_then(|d| d.audio.as_deref())
            .filter(|a| looks_like_url(a)),
        resp.audio_url.as_deref(),
    ]);

    MusicJob { music_url }
}

/// Video task id rule: `task_id`, `id`.
pub(crate) fn video_submission(resp: &VideoGenerationResponse) -> VideoJob {
    VideoJob::pending(first_present([resp.task_id.as_deref(), resp.id.as_deref()]))
}

/// Video URL rule: `video_url`, `download_url`, `file.download_url`.
///
/// Returns the job and, when the job succeeded without a URL, the `file_id`
/// that still needs resolving.
pub(crate) fn video_status(resp: &VideoStatusResponse) -> (VideoJob, Option<String>) {
    let status = resp
        .status
        .as_deref()
        .map(job_status)
        .unwrap_or(JobStatus::Pending);

    let video_url = first_present([
        resp.video_url.as_deref(),
        resp.download_url.as_deref(),
        resp.file.as_ref().and_then(|f| f.download_url.as_deref()),
    ]);

    let error = match status {
        JobStatus::Failed => Some(
            first_present([resp.error_message.as_deref()])
                .unwrap_or_else(|| "Video generation failed".to_string()),
        ),
        _ => None,
    };

    let unresolved_file = match (status, &video_url) {
        (JobStatus::Succeeded, None) => first_present([resp.file_id.as_deref()]),
        _ => None,
    };

    let job = VideoJob {
        task_id: first_present([resp.task_id.as_deref()]),
        status,
        video_url,
        error,
    };
    (job, unresolved_file)
}

/// File download URL rule: `file.download_url`.
pub(crate) fn file_download_url(resp: &FileRetrieveResponse) -> Option<String> {
    first_present([resp.file.as_ref().and_then(|f| f.download_url.as_deref())])
}

/// Error message rule: `base_resp.status_msg`, `error.message`, `message`,
/// then [`FALLBACK_ERROR_MESSAGE`].
pub(crate) fn error_message(body: &str) -> String {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    first_present([
        parsed.base_resp.as_ref().map(|b| b.status_msg.as_str()),
        parsed.error.as_ref().and_then(|e| e.message.as_deref()),
        parsed.message.as_deref(),
    ])
    .unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_string())
}
