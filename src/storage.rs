use std::{
    cell::RefCell,
    collections::HashMap,
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use log::{debug, error, info, trace};
use serde_json::Value;
use tempfile::NamedTempFile;

use crate::{Result, StickiesError};

/// Key holding the committed notes collection
pub const NOTES_KEY: &str = "keepNotes";

/// Key holding the note being composed
pub const DRAFT_KEY: &str = "noteDraft";

/// Durable key-value storage for JSON values.
///
/// Writes are whole-value replacements; nothing is batched or retried.
pub trait KeyValueStore {
    /// Reads the value stored under `key`, if any
    fn load(&self, key: &str) -> Result<Option<Value>>;

    /// Replaces the value stored under `key`
    fn save(&self, key: &str, value: &Value) -> Result<()>;

    /// Deletes `key`; deleting an absent key succeeds
    fn remove(&self, key: &str) -> Result<()>;
}

/// Stores each key as `<key>.json` inside a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens the store, creating the directory if it does not exist
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if !dir.exists() {
            debug!("Data directory does not exist, creating: {}", dir.display());
            fs::create_dir_all(&dir).map_err(|e| {
                error!("Failed to create data directory: {}", e);
                StickiesError::DirectoryError { path: dir.clone() }
            })?;
        }

        info!("Opened file store at {}", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// Writes through a temporary file in the same directory so a failed
    /// write never leaves a truncated value behind
    fn write_atomic(&self, path: &Path, json: &str) -> io::Result<()> {
        let mut temp_file = NamedTempFile::new_in(&self.dir)?;
        trace!("Writing to temporary file");
        temp_file.write_all(json.as_bytes())?;
        temp_file.flush()?;
        temp_file.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<Value>> {
        let path = self.path_for(key);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                trace!("No stored value for {}", key);
                return Ok(None);
            }
            Err(e) => {
                error!("Failed to read {}: {}", path.display(), e);
                return Err(StickiesError::Io(e));
            }
        };

        let value = serde_json::from_str(&text)?;
        Ok(Some(value))
    }

    fn save(&self, key: &str, value: &Value) -> Result<()> {
        let path = self.path_for(key);
        debug!("Saving {} to {}", key, path.display());

        let json = serde_json::to_string(value)?;
        self.write_atomic(&path, &json).map_err(|e| {
            error!("Failed to persist {}: {}", path.display(), e);
            StickiesError::StorageWrite {
                key: key.to_string(),
                source: e,
            }
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!("Removed {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StickiesError::Io(e)),
        }
    }
}

/// In-process store, useful for embedding and tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.borrow().contains_key(key)
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn save(&self, key: &str, value: &Value) -> Result<()> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.clone());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.values.borrow_mut().remove(key);
        Ok(())
    }
}
