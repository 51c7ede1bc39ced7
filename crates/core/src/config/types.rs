use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub uploads: UploadConfig,
    #[serde(default)]
    pub client: ClientConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    3001
}

/// Generative media provider (MiniMax) configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// API key. Usually supplied through `MINIMAX_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Provider base URL (e.g., "https://api.minimax.io")
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Transport timeout in seconds (default: 60)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_image_model")]
    pub image_model: String,
    #[serde(default = "default_music_model")]
    pub music_model: String,
    #[serde(default = "default_video_model")]
    pub video_model: String,
}

impl ProviderConfig {
    /// The API key, if one is set and non-blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            image_model: default_image_model(),
            music_model: default_music_model(),
            video_model: default_video_model(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.minimax.io".to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_image_model() -> String {
    "image-01".to_string()
}

fn default_music_model() -> String {
    "music-1.5".to_string()
}

fn default_video_model() -> String {
    "I2V-01".to_string()
}

/// Orchestration tuning
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenerationConfig {
    /// Maximum image status queries before falling back to the initial URL.
    #[serde(default = "default_image_poll_attempts")]
    pub image_poll_attempts: u32,
    /// Delay before each image status query (milliseconds).
    #[serde(default = "default_image_poll_interval")]
    pub image_poll_interval_ms: u64,
}

impl GenerationConfig {
    pub fn image_poll_interval(&self) -> Duration {
        Duration::from_millis(self.image_poll_interval_ms)
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            image_poll_attempts: default_image_poll_attempts(),
            image_poll_interval_ms: default_image_poll_interval(),
        }
    }
}

fn default_image_poll_attempts() -> u32 {
    5
}

fn default_image_poll_interval() -> u64 {
    2000 // 2 seconds
}

/// Uploaded file storage
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UploadConfig {
    #[serde(default = "default_upload_dir")]
    pub dir: PathBuf,
    /// Largest accepted upload in bytes (default: 10 MiB)
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,
    /// Files older than this are removed by the sweeper.
    #[serde(default = "default_retention")]
    pub retention_secs: u64,
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: default_upload_dir(),
            max_bytes: default_max_bytes(),
            retention_secs: default_retention(),
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploads")
}

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

fn default_max_bytes() -> usize {
    DEFAULT_MAX_UPLOAD_BYTES
}

fn default_retention() -> u64 {
    3600
}

fn default_sweep_interval() -> u64 {
    3600
}

/// Settings for the submitting client's status polling
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    #[serde(default = "default_client_poll_interval")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_max_poll_attempts")]
    pub max_poll_attempts: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_client_poll_interval(),
            max_poll_attempts: default_max_poll_attempts(),
        }
    }
}

fn default_client_poll_interval() -> u64 {
    3000 // 3 seconds
}

fn default_max_poll_attempts() -> u32 {
    200 // 10 minutes at the default interval
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub provider: SanitizedProviderConfig,
    pub generation: GenerationConfig,
    pub uploads: UploadConfig,
    pub client: ClientConfig,
}

/// Sanitized provider config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedProviderConfig {
    pub base_url: String,
    pub api_key_configured: bool,
    pub timeout_secs: u64,
    pub image_model: String,
    pub music_model: String,
    pub video_model: String,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        let p = &config.provider;
        Self {
            server: config.server.clone(),
            provider: SanitizedProviderConfig {
                base_url: p.base_url.clone(),
                api_key_configured: p.api_key().is_some(),
                timeout_secs: p.timeout_secs,
                image_model: p.image_model.clone(),
                music_model: p.music_model.clone(),
                video_model: p.video_model.clone(),
            },
            generation: config.generation.clone(),
            uploads: config.uploads.clone(),
            client: config.client.clone(),
        }
    }
}
