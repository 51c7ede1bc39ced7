use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Polling attempts and intervals are non-zero
/// - Upload size limit is non-zero
///
/// A missing API key is not a validation error: the server still starts and
/// reports it through `/api/health`.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.provider.base_url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "provider.base_url cannot be empty".to_string(),
        ));
    }

    if config.generation.image_poll_attempts == 0 {
        return Err(ConfigError::ValidationError(
            "generation.image_poll_attempts must be at least 1".to_string(),
        ));
    }

    if config.generation.image_poll_interval_ms == 0 {
        return Err(ConfigError::ValidationError(
            "generation.image_poll_interval_ms cannot be 0".to_string(),
        ));
    }

    if config.uploads.max_bytes == 0 {
        return Err(ConfigError::ValidationError(
            "uploads.max_bytes cannot be 0".to_string(),
        ));
    }

    if config.uploads.sweep_interval_secs == 0 {
        return Err(ConfigError::ValidationError(
            "uploads.sweep_interval_secs cannot be 0".to_string(),
        ));
    }

    if config.client.poll_interval_ms == 0 || config.client.max_poll_attempts == 0 {
        return Err(ConfigError::ValidationError(
            "client polling interval and attempts must be non-zero".to_string(),
        ));
    }

    Ok(())
}
