use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::error;

use lyricreel_core::{GenerationError, StatusReport};

use super::handlers::{error_response, ErrorResponse};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum StatusResponse {
    Processing,
    Success {
        #[serde(rename = "videoUrl")]
        video_url: String,
    },
    Failed {
        error: String,
    },
}

impl From<StatusReport> for StatusResponse {
    fn from(report: StatusReport) -> Self {
        match report {
            StatusReport::Processing => StatusResponse::Processing,
            StatusReport::Success { video_url } => StatusResponse::Success { video_url },
            StatusReport::Failed { error } => StatusResponse::Failed { error },
        }
    }
}

/// Check a video task.
///
/// GET /api/status/{task_id}
pub async fn get_status(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<String>,
) -> Result<Json<StatusResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state.status_checker().check(&task_id).await {
        Ok(report) => Ok(Json(report.into())),
        Err(GenerationError::TaskNotFound(_)) => {
            Err(error_response(StatusCode::NOT_FOUND, "Task not found"))
        }
        Err(e) => {
            error!("Status check for {} failed: {}", task_id, e);
            Err(error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}
