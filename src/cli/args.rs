// src/cli/args.rs
use crate::domain::NoteId;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)] // Read from `Cargo.toml`
#[command(arg_required_else_help = true, disable_help_subcommand = true)]
pub struct Args {
    /// Base URL of the notes API (beats NOTES_API_BASE, NOTES_BACKEND_URL, NOTES_API_BASE_URL)
    #[arg(short = 'u', long, value_name = "URL", global = true)]
    pub base_url: Option<String>,

    /// Path to settings file (optional)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity level (-v = debug, -vv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List all notes
    List {
        /// Output notes as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a single note
    Show {
        /// Note ID to show
        #[arg(value_name = "NOTE_ID")]
        id: NoteId,

        /// Output note as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a note (defaults to the configured placeholder)
    New {
        #[arg(short, long)]
        title: Option<String>,

        #[arg(long)]
        content: Option<String>,
    },

    /// Edit a note; opens $VISUAL/$EDITOR unless --title or --content is given
    Edit {
        /// Note ID to edit
        #[arg(value_name = "NOTE_ID")]
        id: NoteId,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(long)]
        content: Option<String>,
    },

    /// Delete a note
    Delete {
        /// Note ID to delete
        #[arg(value_name = "NOTE_ID")]
        id: NoteId,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Interactive list/detail session
    Shell,

    /// Print the resolved API base URL and where it came from
    Config,
}
