// Import necessary libraries and modules for file I/O and serialization.
use crate::error::Result;
use crate::save::{FileStore, STORAGE_KEY, SaveManager};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

pub const SETTINGS_PATH: &str = "./data/settings.json";

// Define a structure to hold application settings with serialization and deserialization capabilities.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub data_dir: PathBuf,   // Directory holding the saved record and the log file.
    pub storage_key: String, // Key the mana record is stored under.
    pub debug_mode: bool,    // Flag to enable or disable debug logging.
}

// Implement the Default trait for Settings to provide a method to create default settings.
impl Default for Settings {
    fn default() -> Self {
        Settings {
            data_dir: PathBuf::from("./data"),
            storage_key: STORAGE_KEY.to_string(),
            debug_mode: false,
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    // Settings rooted at `~/basalt/data` instead of the working directory.
    pub fn in_home() -> Option<Self> {
        let data_dir = dir::home_dir()?.join("basalt").join("data");
        Some(Settings {
            data_dir,
            ..Self::default()
        })
    }

    // Load settings from the default file path, falling back to defaults when it is absent.
    pub fn load() -> Result<Self> {
        Self::load_or_default(SETTINGS_PATH)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to_file(SETTINGS_PATH)
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        match Self::load_settings_from_file(path) {
            Ok(settings) => Ok(settings),
            Err(crate::error::ManaError::IO(e)) if e.kind() == ErrorKind::NotFound => {
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    pub fn load_settings_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = fs::read_to_string(path)?; // Read settings from file.
        let settings = serde_json::from_str(&data)?; // Deserialize JSON data into settings.
        Ok(settings)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let data = serde_json::to_string_pretty(self)?; // Serialize settings into pretty JSON format.
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?; // Create the directory if it doesn't exist.
        }
        let mut file = fs::File::create(path)?;
        file.write_all(data.as_bytes())?;
        Ok(())
    }

    pub fn save_dir(&self) -> PathBuf {
        self.data_dir.join("save")
    }

    pub fn file_store(&self) -> FileStore {
        FileStore::new(self.save_dir())
    }

    // Save manager writing under the configured storage key.
    pub fn save_manager(&self) -> SaveManager<FileStore> {
        SaveManager::with_key(self.file_store(), self.storage_key.as_str())
    }

    pub fn log_level(&self) -> LevelFilter {
        if self.debug_mode {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}
