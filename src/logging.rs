use env_logger::{Builder, Env, Target};
use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;

const LOG_ENV: &str = "JOTTER_LOG";
const DEFAULT_FILTER: &str = "warn";
pub const LOG_FILE: &str = "jotter.log";

pub enum LogTarget {
    Stderr,
    /// Append to a file; used while the TUI owns the terminal.
    File(PathBuf),
}

pub fn init(target: LogTarget) {
    let mut builder = Builder::from_env(Env::new().filter_or(LOG_ENV, DEFAULT_FILTER));
    builder.format_timestamp_secs();
    if let LogTarget::File(path) = target {
        let file = path
            .parent()
            .map_or(Ok(()), fs::create_dir_all)
            .and_then(|_| OpenOptions::new().create(true).append(true).open(&path));
        match file {
            Ok(file) => builder.target(Target::Pipe(Box::new(file))),
            // Nowhere safe to write; stderr would draw over the TUI.
            Err(_) => builder.target(Target::Pipe(Box::new(io::sink()))),
        };
    }
    // Keep the first logger if one is already installed.
    let _ = builder.try_init();
}
