// src/lib.rs
pub mod application;
pub mod cli;
pub mod constants;
pub mod domain;
pub mod infrastructure;
pub mod ports;
pub mod util;

use anyhow::Result;
use application::NotesController;
use infrastructure::config::resolve_from;
use infrastructure::{HttpNotesApi, Settings};
use std::io;
use tracing::{debug, info};
use crate::cli::args::{Args, Command};
use crate::cli::Shell;

pub fn run(args: Args) -> Result<()> {
    debug!(?args, "Starting simple-notes with arguments");

    // Resolve configuration
    let settings = Settings::load_or_default(args.config.as_deref())?;
    let resolved = resolve_from(args.base_url.as_deref(), &settings, |name| {
        std::env::var(name).ok()
    });

    if let Command::Config = args.command {
        println!("base_url = {}", resolved.url);
        println!("source   = {}", resolved.source);
        return Ok(());
    }

    // Initialize infrastructure and application
    let api = HttpNotesApi::new(resolved.url)?;
    let mut controller = NotesController::new(api).with_new_note_fields(settings.new_note_fields());

    let stdin = io::stdin();
    let stdout = io::stdout();

    match args.command {
        Command::Shell => {
            info!("Starting interactive shell");
            let mut shell = Shell::new(controller, stdin.lock(), stdout.lock());
            shell.run()
        }
        command => cli::commands::execute(
            &mut controller,
            command,
            &mut stdin.lock(),
            &mut stdout.lock(),
        ),
    }
}
