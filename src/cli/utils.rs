//! Shared CLI plumbing: config resolution, stash opening, range parsing.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

use crate::config::{load_config, Config};
use crate::domain::{LineRange, OptimizeOptions};
use crate::store::{ContextStore, JsonFileStore};
use crate::tokens::TokenEstimator;

const DEFAULT_STASH_FILE: &str = ".context-stash.json";

pub struct AppContext {
    pub store: ContextStore,
    pub options: OptimizeOptions,
}

impl AppContext {
    /// Resolve config and stash path, then open the store.
    ///
    /// Stash precedence: `--stash` flag, then `stash_file` from config, then
    /// `.context-stash.json` in the working directory.
    pub fn open(stash: Option<&Path>, config_path: Option<&Path>) -> Result<Self> {
        let cwd = std::env::current_dir().context("cannot determine working directory")?;
        let config: Config = load_config(&cwd, config_path)?;

        let stash_path: PathBuf = match stash {
            Some(path) => path.to_path_buf(),
            None => match &config.stash_file {
                Some(path) => cwd.join(path),
                None => cwd.join(DEFAULT_STASH_FILE),
            },
        };

        let options: OptimizeOptions = config.optimize.into();
        let kv = JsonFileStore::open(&stash_path)
            .with_context(|| format!("opening stash {}", stash_path.display()))?;
        let store = ContextStore::open(Box::new(kv), TokenEstimator::new(), options)?;
        Ok(Self { store, options })
    }
}

/// Parse a 1-indexed inclusive `START:END` span into a zero-indexed
/// [`LineRange`].
pub fn parse_range(value: &str) -> Result<LineRange> {
    let Some((start, end)) = value.split_once(':') else {
        bail!("Invalid range '{value}': expected START:END");
    };
    let start: usize = start.trim().parse().with_context(|| format!("Invalid range '{value}'"))?;
    let end: usize = end.trim().parse().with_context(|| format!("Invalid range '{value}'"))?;
    if start == 0 || end == 0 {
        bail!("Invalid range '{value}': lines are 1-indexed");
    }
    LineRange::new(start - 1, end - 1)
        .with_context(|| format!("Invalid range '{value}': start is past end"))
}
