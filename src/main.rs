//! context-stash: ordered context collection and LLM-ready export.

use anyhow::Result;

fn main() -> Result<()> {
    context_stash::cli::run()
}
