use crate::cli::StoreArgs;
use crate::logging::{self, LogTarget};
use crate::ui;
use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
use jotter::storage::{init_project_store, init_store, locate_store, FileStore, StoreLocation};
use jotter::{Change, Note, NoteStore};
use std::env;
use std::io::{self, Read};
use std::path::PathBuf;

pub fn init(args: &StoreArgs) -> Result<()> {
    let location = match &args.dir {
        Some(dir) => {
            let location = locate_store(&env::current_dir()?, Some(dir.clone()))?;
            init_store(&location, &args.key)?;
            location
        }
        None => init_project_store(&env::current_dir()?, &args.key)?,
    };
    println!("Initialized notes at {}", location.dir.display());
    Ok(())
}

pub fn list(args: &StoreArgs) -> Result<()> {
    let (notes, location, path) = open_notes(args)?;
    println!(
        "Notes: {} ({}, {})",
        notes.len(),
        location.scope,
        path.display()
    );
    if notes.is_empty() {
        println!("  (no notes yet)");
    }
    for note in notes.list().notes {
        print_note(note);
    }
    Ok(())
}

pub fn add(args: &StoreArgs, content: Option<String>, stdin: bool) -> Result<()> {
    let text = note_text(content, stdin)?;
    let (mut notes, _, _) = open_notes(args)?;
    let change = notes.create(&text)?;
    warn_if_unsaved(&change);
    println!("Added note {}", change.value);
    Ok(())
}

pub fn edit(
    args: &StoreArgs,
    note_id: String,
    content: Option<String>,
    stdin: bool,
) -> Result<()> {
    let text = note_text(content, stdin)?;
    let (mut notes, _, _) = open_notes(args)?;
    let change = notes
        .update(&note_id, &text)
        .with_context(|| format!("editing note {}", note_id))?;
    warn_if_unsaved(&change);
    println!("Updated note {}", note_id);
    Ok(())
}

pub fn delete(args: &StoreArgs, note_id: String) -> Result<()> {
    let (mut notes, _, _) = open_notes(args)?;
    let change = notes.delete(&note_id);
    warn_if_unsaved(&change);
    if change.value {
        println!("Deleted note {}", note_id);
    } else {
        println!("No note {}; nothing to delete", note_id);
    }
    Ok(())
}

pub fn tui(args: &StoreArgs) -> Result<()> {
    let cwd = env::current_dir()?;
    let location = locate_store(&cwd, args.dir.clone())?;
    logging::init(LogTarget::File(location.dir.join(logging::LOG_FILE)));
    let (notes, location, _) = open_at(location, &args.key)?;
    ui::run(notes, location)
}

fn open_notes(args: &StoreArgs) -> Result<(NoteStore<FileStore>, StoreLocation, PathBuf)> {
    let cwd = env::current_dir()?;
    let location = locate_store(&cwd, args.dir.clone())?;
    open_at(location, &args.key)
}

fn open_at(
    location: StoreLocation,
    key: &str,
) -> Result<(NoteStore<FileStore>, StoreLocation, PathBuf)> {
    let store = location.open();
    let path = store.path_for(key)?;
    let notes = NoteStore::load(store, key);
    Ok((notes, location, path))
}

fn note_text(content: Option<String>, stdin: bool) -> Result<String> {
    if stdin {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("reading note from stdin")?;
        return Ok(buf);
    }
    Ok(content.unwrap_or_default())
}

fn warn_if_unsaved<T>(change: &Change<T>) {
    if let Some(err) = change.warning() {
        eprintln!("warning: change was not saved: {}", err);
    }
}

pub fn format_created(dt: &DateTime<Utc>) -> String {
    dt.with_timezone(&Local).format("%Y.%m.%d@%H:%M").to_string()
}

fn print_note(note: &Note) {
    match &note.created_at {
        Some(created) => println!("  - {}  {}", note.id, format_created(created)),
        None => println!("  - {}", note.id),
    }
    for line in note.content.lines() {
        println!("    {}", line);
    }
}
