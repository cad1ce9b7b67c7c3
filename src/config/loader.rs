//! Configuration file discovery and loading.

use crate::config::schema::HostprepConfig;
use crate::error::{HostprepError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Location of the user's config: `<config dir>/hostprep/config.yml`.
pub fn user_config_path() -> Option<PathBuf> {
    Some(dirs::config_dir()?.join("hostprep").join("config.yml"))
}

/// Load configuration for a run.
///
/// An explicit path must exist. Without one, the user config is used when
/// present, and the built-in defaults otherwise.
///
/// # Errors
///
/// Returns `ConfigNotFound` if an explicit file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config(explicit: Option<&Path>) -> Result<HostprepConfig> {
    if let Some(path) = explicit {
        return load_config_file(path);
    }

    match user_config_path() {
        Some(path) if path.is_file() => {
            tracing::debug!("Loading user config from {}", path.display());
            load_config_file(&path)
        }
        _ => Ok(HostprepConfig::default()),
    }
}

/// Load a single config file and parse it into HostprepConfig.
pub fn load_config_file(path: &Path) -> Result<HostprepConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            HostprepError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            HostprepError::Io(e)
        }
    })?;

    parse_config(&content, path)
}

/// Parse YAML content into HostprepConfig.
///
/// An empty document yields the defaults.
pub fn parse_config(content: &str, source_path: &Path) -> Result<HostprepConfig> {
    if content.trim().is_empty() {
        return Ok(HostprepConfig::default());
    }

    serde_yaml::from_str(content).map_err(|e| HostprepError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}
