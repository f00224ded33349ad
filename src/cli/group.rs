//! Saved-group subcommands.

use anyhow::Result;
use clap::{Args, Subcommand};

use super::utils::AppContext;

#[derive(Args)]
pub struct GroupArgs {
    #[command(subcommand)]
    command: GroupCommands,
}

#[derive(Subcommand)]
enum GroupCommands {
    /// Freeze the current context set under a name
    Save {
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// List saved groups (pinned first, then newest first)
    List,

    /// Replace the live context set with a saved group's items
    Restore {
        #[arg(value_name = "ID")]
        id: String,
    },

    /// Delete a saved group
    Delete {
        #[arg(value_name = "ID")]
        id: String,
    },

    /// Toggle a group's pin
    Pin {
        #[arg(value_name = "ID")]
        id: String,
    },
}

pub fn run(mut app: AppContext, args: GroupArgs) -> Result<()> {
    match args.command {
        GroupCommands::Save { name } => {
            let group = app.store.save_group(name)?;
            println!(
                "Saved '{}' ({} item(s), {} token(s), id {})",
                group.name,
                group.items.len(),
                group.total_tokens,
                group.id
            );
        }
        GroupCommands::List => {
            let groups = app.store.groups();
            if groups.is_empty() {
                println!("No saved groups");
                return Ok(());
            }
            for group in groups {
                let pin = if group.pinned { "*" } else { " " };
                println!(
                    "{pin} {}  {} item(s), {} token(s), saved {}  (id {})",
                    group.name,
                    group.items.len(),
                    group.total_tokens,
                    group.created_at.format("%Y-%m-%d %H:%M"),
                    group.id
                );
            }
        }
        GroupCommands::Restore { id } => {
            app.store.restore_group(&id)?;
            println!("Restored; {} item(s) in set", app.store.items().len());
        }
        GroupCommands::Delete { id } => {
            app.store.delete_group(&id)?;
            println!("Deleted group {id}");
        }
        GroupCommands::Pin { id } => {
            let pinned = app.store.toggle_pin(&id)?;
            println!("Group {id} {}", if pinned { "pinned" } else { "unpinned" });
        }
    }
    Ok(())
}
