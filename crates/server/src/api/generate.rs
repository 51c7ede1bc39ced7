use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};

use lyricreel_core::{
    GenerateOutcome, GenerateRequest, GenerationError, OutcomeStatus, UploadError,
};

use super::handlers::{error_response, ErrorResponse};
use crate::state::AppState;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub status: OutcomeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub music_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub lyrics: String,
}

impl From<GenerateOutcome> for GenerateResponse {
    fn from(outcome: GenerateOutcome) -> Self {
        Self {
            status: outcome.status,
            task_id: outcome.task_id,
            music_url: outcome.music_url,
            image_url: outcome.image_url,
            lyrics: outcome.lyrics,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Accept an image and theme and start a generation.
///
/// POST /api/generate (multipart: `image` file, `theme` text)
pub async fn generate(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<GenerateResponse>, (StatusCode, Json<ErrorResponse>)> {
    let mut theme = None;
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| error_response(e.status(), format!("Invalid form data: {}", e)))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("theme") => {
                let text = field.text().await.map_err(|e| {
                    error_response(e.status(), format!("Invalid theme: {}", e))
                })?;
                theme = Some(text);
            }
            Some("image") => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    error_response(e.status(), format!("Invalid image: {}", e))
                })?;
                if !bytes.is_empty() {
                    image = Some((file_name, bytes));
                }
            }
            other => warn!("Ignoring unexpected form field {:?}", other),
        }
    }

    let theme = theme.unwrap_or_default();
    if theme.trim().is_empty() {
        return Err(error_response(StatusCode::BAD_REQUEST, "Theme is required"));
    }

    let mut request = GenerateRequest::new(theme);
    if let Some((file_name, bytes)) = image {
        let path = state
            .uploads()
            .save(&file_name, &bytes)
            .await
            .map_err(|e| match e {
                UploadError::Io(_) => {
                    error!("Failed to store upload: {}", e);
                    error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
                }
                _ => error_response(StatusCode::BAD_REQUEST, e.to_string()),
            })?;
        request = request.with_upload(path);
    }

    match state.orchestrator().generate(request).await {
        Ok(outcome) => {
            info!(
                "Generation accepted: status={:?} task={:?}",
                outcome.status, outcome.task_id
            );
            Ok(Json(outcome.into()))
        }
        Err(GenerationError::InvalidInput(message)) => {
            Err(error_response(StatusCode::BAD_REQUEST, message))
        }
        Err(e) => {
            error!("Generation failed: {}", e);
            Err(error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}
