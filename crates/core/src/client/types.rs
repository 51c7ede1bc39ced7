use serde::Deserialize;

/// An image ready to be sent as the `image` multipart field.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// MIME type guessed from the file extension.
    pub fn mime_type(&self) -> &'static str {
        let ext = self
            .file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "gif" => "image/gif",
            "webp" => "image/webp",
            _ => "application/octet-stream",
        }
    }
}

/// Body of `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReply {
    pub status: String,
    pub api_key_configured: bool,
}

/// Body of a successful `POST /api/generate`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateReply {
    /// `processing` or `completed`.
    pub status: String,
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(default)]
    pub music_url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub lyrics: String,
}

/// Body of `GET /api/status/{taskId}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum StatusReply {
    Processing,
    Success {
        #[serde(rename = "videoUrl")]
        video_url: String,
    },
    Failed {
        error: String,
    },
}

/// Error body returned by the service.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorReply {
    pub error: String,
}
