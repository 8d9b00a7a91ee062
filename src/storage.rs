use crate::model::encode_notes;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const DEFAULT_KEY: &str = "notes_app_data";
pub const PROJECT_DIR: &str = ".jotter";
const FILE_EXTENSION: &str = "yml";

pub trait KeyValueStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("invalid store key {0:?}")]
    InvalidKey(String),
    #[error("store is read-only, could not write {0}")]
    ReadOnly(String),
    #[error("reading {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("writing {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("serializing notes: {0}")]
    Encode(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{}.{}", key, FILE_EXTENSION)))
    }
}

impl KeyValueStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(data) => Ok(Some(data)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Read { path, source }),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Write {
            path: self.dir.clone(),
            source,
        })?;
        fs::write(&path, value).map_err(|source| StoreError::Write { path, source })
    }
}

#[derive(Debug, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    writable: bool,
    writes: usize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        MemoryStore {
            entries: HashMap::new(),
            writable: true,
            writes: 0,
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut store = Self::default();
        store.entries.insert(key.into(), value.into());
        store
    }

    pub fn set_writable(&mut self, writable: bool) {
        self.writable = writable;
    }

    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if !self.writable {
            return Err(StoreError::ReadOnly(key.to_string()));
        }
        self.entries.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }
}

fn validate_key(key: &str) -> Result<(), StoreError> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreScope {
    Explicit,
    Project,
    Global,
}

impl fmt::Display for StoreScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StoreScope::Explicit => "explicit",
            StoreScope::Project => "project",
            StoreScope::Global => "global",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone)]
pub struct StoreLocation {
    pub dir: PathBuf,
    pub scope: StoreScope,
}

impl StoreLocation {
    pub fn open(&self) -> FileStore {
        FileStore::new(self.dir.clone())
    }
}

pub fn init_project_store(cwd: &Path, key: &str) -> Result<StoreLocation> {
    let location = StoreLocation {
        dir: cwd.join(PROJECT_DIR),
        scope: StoreScope::Project,
    };
    init_store(&location, key)?;
    Ok(location)
}

// Existing notes are left alone.
pub fn init_store(location: &StoreLocation, key: &str) -> Result<PathBuf> {
    fs::create_dir_all(&location.dir)
        .with_context(|| format!("failed to create {:?}", location.dir))?;
    let mut store = location.open();
    let path = store.path_for(key)?;
    if store.read(key)?.is_none() {
        let empty = encode_notes(&[]).context("serializing empty collection")?;
        store.write(key, &empty)?;
    }
    Ok(path)
}

pub fn locate_store(start: &Path, explicit: Option<PathBuf>) -> Result<StoreLocation> {
    if let Some(dir) = explicit {
        return Ok(StoreLocation {
            dir,
            scope: StoreScope::Explicit,
        });
    }
    if let Some(dir) = find_project_dir(start) {
        return Ok(StoreLocation {
            dir,
            scope: StoreScope::Project,
        });
    }
    Ok(StoreLocation {
        dir: global_dir()?,
        scope: StoreScope::Global,
    })
}

fn find_project_dir(start: &Path) -> Option<PathBuf> {
    let mut dir = Some(start);
    while let Some(current) = dir {
        let candidate = current.join(PROJECT_DIR);
        if candidate.is_dir() {
            return Some(candidate);
        }
        dir = current.parent();
    }
    None
}

fn global_dir() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", "jotter").context("locating data directory")?;
    Ok(dirs.data_dir().to_path_buf())
}
