use std::fs;
use std::path::{Path, PathBuf};

use super::ConcordanceConfig;
use crate::core::{Error, Result};

pub const CONFIG_FILE: &str = ".concordance.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Parse a TOML string and validate the result.
pub fn parse_and_validate_config(contents: &str) -> std::result::Result<ConcordanceConfig, String> {
    let config = toml::from_str::<ConcordanceConfig>(contents)
        .map_err(|e| format!("Failed to parse {}: {}", CONFIG_FILE, e))?;
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

/// Load an explicitly named config file. Unlike [`load_config`], every
/// failure is an error.
pub fn load_config_from(path: &Path) -> Result<ConcordanceConfig> {
    let contents = fs::read_to_string(path).map_err(|e| Error::input(path, e.to_string()))?;
    let config = parse_and_validate_config(&contents).map_err(Error::Configuration)?;
    tracing::debug!("Loaded config from {}", path.display());
    Ok(config)
}

fn try_load_config_from_path(config_path: &Path) -> Option<ConcordanceConfig> {
    let contents = match fs::read_to_string(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(
                    "Failed to read config file {}: {}",
                    config_path.display(),
                    e
                );
            }
            return None;
        }
    };

    match parse_and_validate_config(&contents) {
        Ok(config) => {
            tracing::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            tracing::warn!("{}. Using defaults.", e);
            None
        }
    }
}

/// `start` and up to `max_depth - 1` of its ancestors.
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Search the working directory and its ancestors for `.concordance.toml`.
pub fn load_config() -> ConcordanceConfig {
    let current = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            tracing::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            return ConcordanceConfig::default();
        }
    };

    directory_ancestors(current, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            tracing::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            ConcordanceConfig::default()
        })
}
