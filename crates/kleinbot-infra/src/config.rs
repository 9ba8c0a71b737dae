//! Configuration loader for KleinBot.
//!
//! Reads a TOML file into [`KleinConfig`]. Falls back to defaults when the
//! file is missing or malformed, so a bare deployment only needs secrets.

use std::path::Path;

use kleinbot_types::config::KleinConfig;

/// Default configuration file name, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "kleinbot.toml";

/// Load configuration from `path`.
///
/// - If the file does not exist, returns [`KleinConfig::default()`].
/// - If the file exists but fails to read or parse, logs a warning and
///   returns the default.
pub async fn load_config(path: &Path) -> KleinConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return KleinConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return KleinConfig::default();
        }
    };

    match toml::from_str::<KleinConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            KleinConfig::default()
        }
    }
}
