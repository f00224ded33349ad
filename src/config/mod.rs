//! Config file loading.
//!
//! Precedence is CLI > config file > defaults. An explicitly passed config
//! path fails loudly on parse errors; an auto-discovered file only warns and
//! falls back to defaults.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::OptimizeOptions;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the stash file lives; relative paths resolve against the working
    /// directory.
    pub stash_file: Option<PathBuf>,
    pub optimize: OptimizeSection,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct OptimizeSection {
    pub remove_comments: bool,
    pub remove_empty_lines: bool,
}

impl From<OptimizeSection> for OptimizeOptions {
    fn from(section: OptimizeSection) -> Self {
        Self {
            remove_comments: section.remove_comments,
            remove_empty_lines: section.remove_empty_lines,
        }
    }
}

pub fn load_config(cwd: &Path, config_path: Option<&Path>) -> Result<Config> {
    let config_path_provided = config_path.is_some();

    let discovered = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => discover_config(cwd),
    };

    let Some(config_file) = discovered else {
        return Ok(Config::default());
    };

    let content = fs::read_to_string(&config_file)
        .with_context(|| format!("Failed reading config file: {}", config_file.display()))?;

    match parse_toml_config(&content, &config_file) {
        Ok(config) => Ok(config),
        Err(e) => {
            if config_path_provided {
                return Err(e);
            }
            tracing::warn!(
                "Failed to parse auto-discovered config {}: {}",
                config_file.display(),
                e
            );
            Ok(Config::default())
        }
    }
}

/// Parse TOML config, supporting a nested `[context-stash]` section so the
/// file can live inside a larger project config.
fn parse_toml_config(content: &str, config_file: &Path) -> Result<Config> {
    let raw: toml::Value = toml::from_str(content)
        .with_context(|| format!("Invalid TOML syntax: {}", config_file.display()))?;

    let config_val = match raw.get("context-stash") {
        Some(nested) => nested.clone(),
        None => raw,
    };

    config_val
        .try_into()
        .with_context(|| format!("Invalid config: {}", config_file.display()))
}

fn discover_config(cwd: &Path) -> Option<PathBuf> {
    let candidates = ["context-stash.toml", ".context-stash.toml"];
    for candidate in candidates {
        let path = cwd.join(candidate);
        if path.exists() {
            return Some(path);
        }
    }
    None
}
