//! Configuration loading for dugout.
//!
//! Reads `config.toml` from the data directory (`~/.dugout/` by default)
//! into [`DugoutConfig`]. Falls back to defaults when the file is missing
//! or malformed.

use std::path::{Path, PathBuf};

use secrecy::SecretString;
use thiserror::Error;

use dugout_types::config::{DugoutConfig, LlmSettings};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "DUGOUT_DATA_DIR";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("API key not found: set the {env} environment variable")]
    MissingApiKey { env: String },
}

/// Resolve the data directory.
///
/// Priority: `$DUGOUT_DATA_DIR`, then `~/.dugout`, then `./.dugout`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".dugout");
    }

    PathBuf::from(".dugout")
}

/// Load configuration from `{data_dir}/config.toml`.
///
/// - Missing file: defaults.
/// - Unreadable or unparsable file: logs a warning, defaults.
pub async fn load_config(data_dir: &Path) -> DugoutConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return DugoutConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return DugoutConfig::default();
        }
    };

    match toml::from_str::<DugoutConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            DugoutConfig::default()
        }
    }
}

/// Read the provider API key from the environment variable named in
/// `settings.api_key_env`. Empty values count as missing.
pub fn resolve_api_key(settings: &LlmSettings) -> Result<SecretString, ConfigError> {
    match std::env::var(&settings.api_key_env) {
        Ok(value) if !value.trim().is_empty() => Ok(SecretString::from(value)),
        _ => Err(ConfigError::MissingApiKey {
            env: settings.api_key_env.clone(),
        }),
    }
}
