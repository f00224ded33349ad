//! Export command implementation.

use anyhow::{Context, Result};
use clap::Args;
use std::fs;
use std::path::PathBuf;

use super::utils::AppContext;
use crate::domain::OptimizeOptions;
use crate::export::assemble;
use crate::source::FsReader;

#[derive(Args)]
pub struct ExportArgs {
    /// Write the document to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Strip comments from file content (overrides config)
    #[arg(long)]
    pub remove_comments: bool,

    /// Remove blank lines and trailing whitespace (overrides config)
    #[arg(long)]
    pub remove_empty_lines: bool,
}

pub fn run(app: AppContext, args: ExportArgs) -> Result<()> {
    // Flags can only tighten the config: either flag set means that pass runs.
    let options = OptimizeOptions {
        remove_comments: app.options.remove_comments || args.remove_comments,
        remove_empty_lines: app.options.remove_empty_lines || args.remove_empty_lines,
    };

    let result = assemble(app.store.items(), options, &FsReader);

    match &args.output {
        Some(path) => {
            fs::write(path, &result.text)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("Exported {} item(s) to {}", app.store.items().len(), path.display());
        }
        None => print!("{}", result.text),
    }

    // Keep stdout clean for the document itself.
    if result.redacted_count > 0 {
        eprintln!("Redacted {} secret(s)", result.redacted_count);
    }
    Ok(())
}
