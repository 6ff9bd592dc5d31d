//! Command-line interface for tm
//!
//! This module defines the CLI structure using clap derive macros.
//! Task commands live in `task`, workspace (`p*`) commands in `workspace`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::error::Result;
use crate::manager::Manager;
use crate::output::OutputOptions;
use crate::storage;

mod init;
mod task;
mod workspace;

/// tm - Task Manager
///
/// Short text notes grouped into per-directory workspaces, with archiving,
/// id compaction, and search across workspaces.
#[derive(Parser, Debug)]
#[command(name = "tm")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding the workspace registry and config (defaults to ~/.tm)
    #[arg(long, global = true, env = "TM_HOME")]
    pub home: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a workspace in the current directory and register it
    Init,

    /// Add a task
    Add {
        /// Task text (words are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Target workspace id (defaults to the current directory)
        #[arg(short = 'p', long = "project")]
        project: Option<u32>,
    },

    /// List active tasks
    List {
        /// Target workspace id
        #[arg(short = 'p', long = "project")]
        project: Option<u32>,

        /// List tasks of every active workspace
        #[arg(short, long)]
        global: bool,

        /// List archived tasks instead of active ones
        #[arg(long)]
        archived: bool,
    },

    /// Remove a task
    Remove {
        /// Task id
        id: u32,

        /// Target workspace id
        #[arg(short = 'p', long = "project")]
        project: Option<u32>,
    },

    /// Archive a task
    Archive {
        /// Task id
        id: u32,

        /// Target workspace id
        #[arg(short = 'p', long = "project")]
        project: Option<u32>,
    },

    /// Renumber task ids (active from 1, archived from the archived base)
    Compact {
        /// Target workspace id
        #[arg(short = 'p', long = "project")]
        project: Option<u32>,
    },

    /// Search active tasks (case-insensitive)
    Find {
        /// Text to search for (words are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Target workspace id
        #[arg(short = 'p', long = "project")]
        project: Option<u32>,

        /// Search every workspace
        #[arg(short, long)]
        global: bool,
    },

    /// List all workspaces
    Plist,

    /// Remove a workspace, renumber the rest, and delete its storage
    Premove {
        /// Workspace id
        id: u32,
    },

    /// Archive a workspace and hide its tasks
    Parchive {
        /// Workspace id
        id: u32,
    },

    /// Reactivate a workspace and restore its hidden tasks
    Preactivate {
        /// Workspace id
        id: u32,
    },

    /// Renumber workspace ids (active from 1, archived from the archived base)
    Pcompact,
}

/// Build a manager for the resolved home and the current directory
fn open_manager(home: Option<PathBuf>) -> Result<Manager> {
    let home = storage::resolve_home(home)?;
    let cwd = std::env::current_dir()?;
    tracing::debug!(home = %home.display(), cwd = %cwd.display(), "opening manager");
    Ok(Manager::new(&home, &cwd))
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let output = OutputOptions {
            json: self.json,
            quiet: self.quiet,
        };
        let manager = open_manager(self.home)?;

        match self.command {
            Commands::Init => init::run(&manager, output),
            Commands::Add { text, project } => task::run_add(
                &manager,
                task::AddOptions {
                    text: text.join(" "),
                    project,
                    output,
                },
            ),
            Commands::List {
                project,
                global,
                archived,
            } => task::run_list(
                &manager,
                task::ListOptions {
                    project,
                    global,
                    archived,
                    output,
                },
            ),
            Commands::Remove { id, project } => task::run_remove(
                &manager,
                task::TaskIdOptions {
                    id,
                    project,
                    output,
                },
            ),
            Commands::Archive { id, project } => task::run_archive(
                &manager,
                task::TaskIdOptions {
                    id,
                    project,
                    output,
                },
            ),
            Commands::Compact { project } => {
                task::run_compact(&manager, task::CompactOptions { project, output })
            }
            Commands::Find {
                text,
                project,
                global,
            } => task::run_find(
                &manager,
                task::FindOptions {
                    text: text.join(" "),
                    project,
                    global,
                    output,
                },
            ),
            Commands::Plist => workspace::run_list(&manager, output),
            Commands::Premove { id } => workspace::run_remove(&manager, id, output),
            Commands::Parchive { id } => workspace::run_archive(&manager, id, output),
            Commands::Preactivate { id } => workspace::run_reactivate(&manager, id, output),
            Commands::Pcompact => workspace::run_compact(&manager, output),
        }
    }
}
