use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Load configuration from file with environment variable overrides.
///
/// The file is optional; every section has defaults. Overrides are applied in
/// order: `LYRICREEL_*` (sections split on `__`), then the deployment variables
/// `MINIMAX_API_KEY` and `PORT`.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let mut figment = Figment::new();
    if path.exists() {
        figment = figment.merge(Toml::file(path));
    }

    figment
        .merge(Env::prefixed("LYRICREEL_").split("__"))
        .merge(
            Env::raw()
                .only(&["MINIMAX_API_KEY"])
                .map(|_| "provider.api_key".into()),
        )
        .merge(Env::raw().only(&["PORT"]).map(|_| "server.port".into()))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load configuration from a file that must exist.
pub fn load_config_strict(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }
    load_config(path)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}
