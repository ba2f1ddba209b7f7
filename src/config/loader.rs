use std::fs;
use std::path::{Path, PathBuf};

use super::core::AnalysisConfig;
use crate::errors::{Error, Result};

pub const CONFIG_FILE_NAME: &str = ".repo-analyzer.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

pub fn parse_config(contents: &str) -> Result<AnalysisConfig> {
    let config = toml::from_str::<AnalysisConfig>(contents)?;
    Ok(config)
}

/// Try one candidate path. Missing files are silent, broken ones warn.
fn try_load_config_from_path(config_path: &Path) -> Option<AnalysisConfig> {
    let contents = match fs::read_to_string(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                log::warn!(
                    "Failed to read config file {}: {}",
                    config_path.display(),
                    e
                );
            }
            return None;
        }
    };

    match parse_config(&contents) {
        Ok(config) => {
            log::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!(
                "Ignoring invalid config {}: {}. Using defaults.",
                config_path.display(),
                e
            );
            None
        }
    }
}

/// Directory ancestors starting at `start`, at most `max_depth` of them
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

/// Search `start` and its ancestors for a config file.
pub fn discover_config(start: PathBuf) -> Option<AnalysisConfig> {
    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
}

/// Load configuration.
///
/// An explicit path must exist and parse. Without one, the current
/// directory and its ancestors are searched, falling back to defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<AnalysisConfig> {
    if let Some(path) = explicit {
        let contents = fs::read_to_string(path).map_err(|e| {
            Error::config(format!("cannot read {}: {}", path.display(), e))
        })?;
        return parse_config(&contents)
            .map_err(|e| Error::config(format!("invalid {}: {}", path.display(), e)));
    }

    let current = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            log::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            return Ok(AnalysisConfig::default());
        }
    };

    Ok(discover_config(current).unwrap_or_else(|| {
        log::debug!(
            "No config found after checking {} directories. Using default config.",
            MAX_TRAVERSAL_DEPTH
        );
        AnalysisConfig::default()
    }))
}
