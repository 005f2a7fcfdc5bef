use crate::error::Result;
use crate::form::MaxManaForm;

use log::{debug, warn};
use std::collections::HashMap;
use std::fs::{create_dir_all, read_to_string, remove_file, write};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const SAVE_DIR: &str = "./data/save";
pub const STORAGE_KEY: &str = "manaTrackerFormValues";

// Text key-value storage the tracker persists into.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&mut self, key: &str) -> Result<()>;
}

// Keeps every key in its own `<key>.json` file inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl Default for FileStore {
    fn default() -> Self {
        Self::new(SAVE_DIR)
    }
}

impl FileStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        match read_to_string(self.path_for(key)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        create_dir_all(&self.dir)?;
        write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        match remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        self.items.remove(key);
        Ok(())
    }
}

// Reads and writes the max mana form under a fixed key.
#[derive(Debug, Clone)]
pub struct SaveManager<S: KeyValueStore> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> SaveManager<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, STORAGE_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn save(&mut self, record: &MaxManaForm) -> Result<()> {
        let serialized = serde_json::to_string(record)?;
        self.store.set_item(&self.key, &serialized)?;
        debug!("Saved mana record under '{}'", self.key);
        Ok(())
    }

    // Load the saved record. Missing, unreadable or malformed data counts as no data.
    pub fn load(&self) -> Option<MaxManaForm> {
        let raw = match self.store.get_item(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to read saved mana record: {}", e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Discarding malformed mana record: {}", e);
                None
            }
        }
    }

    pub fn clear(&mut self) -> Result<()> {
        self.store.remove_item(&self.key)
    }
}
