//! Global configuration loader for Colloquy.
//!
//! Reads `config.toml` from the data directory (`~/.colloquy/` unless
//! `COLLOQUY_DATA_DIR` is set) into [`GlobalConfig`]. Falls back to defaults
//! when the file is missing or malformed.

use std::path::{Path, PathBuf};

use colloquy_types::config::GlobalConfig;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "COLLOQUY_DATA_DIR";

/// Resolve the data directory: `$COLLOQUY_DATA_DIR`, else `~/.colloquy`,
/// else `./.colloquy` when no home directory is known.
pub fn resolve_data_dir() -> PathBuf {
    match std::env::var_os(DATA_DIR_ENV) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".colloquy"),
    }
}

/// Load global configuration from `{data_dir}/config.toml`.
///
/// - Missing file: [`GlobalConfig::default()`].
/// - Unreadable or unparseable file: logs a warning, returns the default.
pub async fn load_global_config(data_dir: &Path) -> GlobalConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
    };

    match toml::from_str::<GlobalConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            GlobalConfig::default()
        }
    }
}
