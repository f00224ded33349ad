//! Tree command: summarize the stashed file paths as a directory tree.

use anyhow::{bail, Result};
use clap::Args;

use super::utils::AppContext;
use crate::domain::ItemKind;
use crate::tree::build_tree;

#[derive(Args)]
pub struct TreeArgs {
    /// Root the tree here instead of at the common ancestor
    #[arg(long, value_name = "PATH")]
    pub root: Option<String>,

    /// Also stash the rendered tree as a note item
    #[arg(long)]
    pub save_note: bool,
}

pub fn run(mut app: AppContext, args: TreeArgs) -> Result<()> {
    let paths: Vec<String> = app
        .store
        .items()
        .iter()
        .filter(|item| item.kind == ItemKind::File)
        .map(|item| item.content.clone())
        .collect();

    if paths.is_empty() {
        bail!("No file items in the context set");
    }

    let rendered = build_tree(&paths, args.root.as_deref())?;
    println!("{rendered}");

    if args.save_note {
        let id = app.store.add_note(rendered)?;
        eprintln!("Saved tree as note {id}");
    }
    Ok(())
}
