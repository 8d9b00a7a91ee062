mod cli;
mod commands;
mod logging;
mod ui;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let store = args.store;
    let command = args.command.unwrap_or(cli::Command::Tui);
    if !matches!(command, cli::Command::Tui) {
        logging::init(logging::LogTarget::Stderr);
    }
    match command {
        cli::Command::Init => commands::init(&store),
        cli::Command::List => commands::list(&store),
        cli::Command::Add { content, stdin } => commands::add(&store, content, stdin),
        cli::Command::Edit {
            note_id,
            content,
            stdin,
        } => commands::edit(&store, note_id, content, stdin),
        cli::Command::Delete { note_id } => commands::delete(&store, note_id),
        cli::Command::Tui => commands::tui(&store),
    }
}
