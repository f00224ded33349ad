//! Command-line interface for context-stash.
//!
//! Thin presentation layer over the library: every subcommand opens the stash
//! file, performs one store or pipeline operation, and exits.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod export;
mod group;
mod stash;
mod tree;
mod utils;

/// Collect files, line ranges, and notes into an ordered context set and
/// export it as a single LLM-ready prompt document
#[derive(Parser)]
#[command(name = "context-stash")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Stash file holding the item sequence and saved groups
    #[arg(short, long, global = true, value_name = "FILE")]
    stash: Option<PathBuf>,

    /// Path to config file (context-stash.toml)
    #[arg(short = 'c', long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Add files (optionally a line range of one file) to the context set
    Add(stash::AddArgs),

    /// Add a free-form note to the context set
    Note(stash::NoteArgs),

    /// List the current context set with token counts
    List,

    /// Remove items by id
    Remove(stash::RemoveArgs),

    /// Replace the item order with the given id sequence
    Reorder(stash::ReorderArgs),

    /// Remove all items
    Clear,

    /// Recalculate token counts for every item
    Recalc,

    /// Render a directory tree of the stashed file paths
    Tree(tree::TreeArgs),

    /// Assemble, optimize, and scrub the export document
    Export(export::ExportArgs),

    /// Save, restore, and manage named snapshots of the context set
    Group(group::GroupArgs),
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Wire verbose flag to the tracing log level.
    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    let app = utils::AppContext::open(cli.stash.as_deref(), cli.config.as_deref())?;

    match cli.command {
        Commands::Add(args) => stash::add(app, args),
        Commands::Note(args) => stash::note(app, args),
        Commands::List => stash::list(app),
        Commands::Remove(args) => stash::remove(app, args),
        Commands::Reorder(args) => stash::reorder(app, args),
        Commands::Clear => stash::clear(app),
        Commands::Recalc => stash::recalc(app),
        Commands::Tree(args) => tree::run(app, args),
        Commands::Export(args) => export::run(app, args),
        Commands::Group(args) => group::run(app, args),
    }
}
