//! Item-mutating subcommands: add, note, list, remove, reorder, clear, recalc.

use anyhow::{bail, Context, Result};
use clap::Args;
use std::path::PathBuf;

use super::utils::{parse_range, AppContext};
use crate::domain::{ContextItem, ItemKind};
use crate::source::FsReader;
use crate::utils::normalize_path;

#[derive(Args)]
pub struct AddArgs {
    /// Files to add
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    /// 1-indexed inclusive line span (single file only), e.g. 12:40
    #[arg(long, value_name = "START:END")]
    pub range: Option<String>,

    /// Display label (single file only)
    #[arg(long, value_name = "NAME")]
    pub label: Option<String>,

    /// Language id used for comment stripping (e.g. rust, python)
    #[arg(long, value_name = "LANG")]
    pub lang: Option<String>,
}

#[derive(Args)]
pub struct NoteArgs {
    /// Note text
    #[arg(value_name = "TEXT")]
    pub text: String,
}

#[derive(Args)]
pub struct RemoveArgs {
    /// Item ids to remove (unknown ids are ignored)
    #[arg(value_name = "ID", required = true)]
    pub ids: Vec<String>,
}

#[derive(Args)]
pub struct ReorderArgs {
    /// The full id sequence in its new order; omitted items are dropped
    #[arg(value_name = "ID", required = true)]
    pub ids: Vec<String>,
}

pub fn add(mut app: AppContext, args: AddArgs) -> Result<()> {
    if args.paths.len() > 1 && (args.range.is_some() || args.label.is_some()) {
        bail!("--range and --label apply to a single file");
    }

    let range = args.range.as_deref().map(parse_range).transpose()?;

    let mut added = 0usize;
    for path in &args.paths {
        let absolute = path
            .canonicalize()
            .with_context(|| format!("cannot resolve {}", path.display()))?;
        let absolute = normalize_path(&absolute.to_string_lossy());

        let mut item = ContextItem::file(absolute);
        if let Some(range) = range {
            item = item.with_range(range);
        }
        if let Some(label) = &args.label {
            item = item.with_label(label.clone());
        }
        if let Some(lang) = &args.lang {
            item = item.with_language(lang.clone());
        }

        if app.store.add(item)? {
            added += 1;
        } else {
            println!("Skipped duplicate: {}", path.display());
        }
    }

    println!("Added {added} item(s); {} in set", app.store.items().len());
    Ok(())
}

pub fn note(mut app: AppContext, args: NoteArgs) -> Result<()> {
    let id = app.store.add_note(args.text)?;
    println!("Added note {id}");
    Ok(())
}

pub fn list(app: AppContext) -> Result<()> {
    let items = app.store.items();
    if items.is_empty() {
        println!("Context set is empty");
        return Ok(());
    }

    for (position, item) in items.iter().enumerate() {
        let kind = match item.kind {
            ItemKind::File => "file",
            ItemKind::Text => "note",
        };
        let span = match item.range {
            Some(range) => format!(" [lines {}-{}]", range.start + 1, range.end + 1),
            None => String::new(),
        };
        let tokens = match item.tokens {
            Some(count) => format!("{count} tok"),
            None => "- tok".to_string(),
        };
        println!(
            "{:>3}. [{kind}] {}{span}  {tokens}  (id {})",
            position + 1,
            item.display_label(),
            item.id
        );
    }
    println!("Total: {} item(s), {} token(s)", items.len(), app.store.total_tokens());
    Ok(())
}

pub fn remove(mut app: AppContext, args: RemoveArgs) -> Result<()> {
    app.store.remove_many(&args.ids)?;
    println!("{} item(s) remain", app.store.items().len());
    Ok(())
}

pub fn reorder(mut app: AppContext, args: ReorderArgs) -> Result<()> {
    app.store.reorder(&args.ids)?;
    println!("Reordered; {} item(s) in set", app.store.items().len());
    Ok(())
}

pub fn clear(mut app: AppContext) -> Result<()> {
    app.store.clear()?;
    println!("Cleared context set");
    Ok(())
}

pub fn recalc(mut app: AppContext) -> Result<()> {
    app.store.recalculate_tokens(&FsReader)?;
    println!("Total: {} token(s)", app.store.total_tokens());
    Ok(())
}
