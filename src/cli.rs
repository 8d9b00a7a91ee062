use clap::{Args, Parser, Subcommand};
use jotter::storage::DEFAULT_KEY;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "jotter", version, about = "Quick local notes, newest first")]
pub struct Cli {
    #[command(flatten)]
    pub store: StoreArgs,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Args, Debug, Clone)]
pub struct StoreArgs {
    /// Directory holding the notes file (overrides project/global lookup)
    #[arg(long, global = true, env = "JOTTER_DIR")]
    pub dir: Option<PathBuf>,
    /// Storage key; notes live in <dir>/<key>.yml
    #[arg(long, global = true, env = "JOTTER_KEY", default_value = DEFAULT_KEY)]
    pub key: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a project note store in the current directory
    Init,
    /// List notes, newest first
    List,
    /// Add a new note
    Add {
        /// Note text
        #[arg(required_unless_present = "stdin")]
        content: Option<String>,
        /// Read the note text from stdin
        #[arg(long, conflicts_with = "content")]
        stdin: bool,
    },
    /// Replace the text of an existing note
    Edit {
        /// Note id to edit
        note_id: String,
        /// New text
        #[arg(required_unless_present = "stdin")]
        content: Option<String>,
        /// Read the new text from stdin
        #[arg(long, conflicts_with = "content")]
        stdin: bool,
    },
    /// Delete a note (no error if it is already gone)
    Delete {
        /// Note id to delete
        note_id: String,
    },
    /// Launch the interactive TUI
    Tui,
}
