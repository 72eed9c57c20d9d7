//! Core TOML config loading: read from path or platform default.

use crate::schema::PagechatConfig;
use crate::validation;
use pagechat_common::ConfigError;
use std::path::Path;
use tracing::{info, warn};

use super::paths::{create_default_config, default_config_path};

/// Load config from a specific TOML file path.
///
/// Missing fields take their serde defaults. Validation problems are only
/// logged here; callers that must reject them run `validation::validate`.
pub fn load_from_path(path: &Path) -> Result<PagechatConfig, ConfigError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ParseError(format!("failed to read {}: {e}", path.display())))?;

    let config: PagechatConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    if let Err(e) = validation::validate(&config) {
        warn!("config validation warning: {e}");
    }

    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Load config from the platform-specific default path.
///
/// On Linux: `~/.config/pagechat/config.toml`
///
/// If the file does not exist, writes the commented default and returns defaults.
pub fn load_default() -> Result<PagechatConfig, ConfigError> {
    let path = default_config_path()?;

    if !path.exists() {
        info!("no config found at {}, creating default", path.display());
        create_default_config(&path)?;
        return Ok(PagechatConfig::default());
    }

    load_from_path(&path)
}
