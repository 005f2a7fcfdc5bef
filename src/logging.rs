use crate::error::{ManaError, Result};
use chrono::Local;
use log::{LevelFilter, Metadata, Record};
use once_cell::sync::OnceCell;
use std::fs::{OpenOptions, create_dir_all};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

pub const LOG_FILE: &str = "log.txt";

#[derive(Debug)]
struct FileLogger {
    log_file: PathBuf,
    level: LevelFilter,
    installed: AtomicBool, // Set once `log::set_logger` accepted this logger.
}

static LOGGER: OnceCell<FileLogger> = OnceCell::new();

impl log::Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
            let log_entry = format!("[{}] {} - {}\n", timestamp, record.level(), record.args());

            if let Ok(mut file) = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.log_file)
            {
                let _ = file.write_all(log_entry.as_bytes());
            }
        }
    }

    fn flush(&self) {}
}

// Install the file logger. Only the first call in a process succeeds.
pub fn init(log_dir: impl AsRef<Path>, level: LevelFilter) -> Result<()> {
    if LOGGER.get().is_some() {
        return Err(ManaError::Logger("Logger already set".to_string()));
    }

    let log_dir = log_dir.as_ref();
    create_dir_all(log_dir)?;

    LOGGER
        .set(FileLogger {
            log_file: log_dir.join(LOG_FILE),
            level,
            installed: AtomicBool::new(false),
        })
        .map_err(|_| ManaError::Logger("Logger already set".to_string()))?;
    let logger = LOGGER
        .get()
        .ok_or_else(|| ManaError::Logger("Logger not stored".to_string()))?;

    log::set_logger(logger)?;
    logger.installed.store(true, Ordering::SeqCst);
    log::set_max_level(logger.level);
    Ok(())
}

// The log file the installed logger writes to, if one is installed.
pub fn log_file() -> Option<&'static Path> {
    LOGGER
        .get()
        .filter(|logger| logger.installed.load(Ordering::SeqCst))
        .map(|logger| logger.log_file.as_path())
}
