//! File-based debug logger for troubleshooting
//!
//! Useful when the test runner swallows stderr: every entry is appended to
//! a log file, one line per entry.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use parking_lot::Mutex;

use super::traits::Logger;

/// Log levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl LogLevel {
    /// Parse a level name, falling back to `Debug` for anything unknown
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "info" => LogLevel::Info,
            "warn" | "warning" => LogLevel::Warn,
            "error" => LogLevel::Error,
            _ => LogLevel::Debug,
        }
    }

    /// Minimum level from `SECRETCACHE_LOG_LEVEL`, `Debug` when unset
    pub fn from_env() -> Self {
        std::env::var("SECRETCACHE_LOG_LEVEL")
            .map(|v| Self::parse(&v))
            .unwrap_or(LogLevel::Debug)
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO "),
            LogLevel::Warn => write!(f, "WARN "),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

/// A logger that appends entries to a file
///
/// If the file cannot be opened the logger silently drops entries; logging
/// is never allowed to fail a secret lookup.
pub struct FileLogger {
    path: PathBuf,
    file: Mutex<Option<File>>,
    min_level: LogLevel,
}

impl FileLogger {
    /// Open (or create) the log file at `path`
    pub fn new(path: impl Into<PathBuf>, min_level: LogLevel) -> Self {
        let path = path.into();
        let file = Self::open(&path);
        Self {
            path,
            file: Mutex::new(file),
            min_level,
        }
    }

    /// Logger writing to `secretcache-debug.log` in the temp directory,
    /// with the level taken from the environment
    pub fn at_default_path() -> Self {
        Self::new(Self::default_log_path(), LogLevel::from_env())
    }

    pub fn default_log_path() -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push("secretcache-debug.log");
        path
    }

    /// Path of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Truncate the log file and keep appending to the fresh one
    pub fn clear(&self) {
        if let Ok(file) = File::create(&self.path) {
            drop(file);
        }
        *self.file.lock() = Self::open(&self.path);
    }

    fn open(path: &Path) -> Option<File> {
        OpenOptions::new().create(true).append(true).open(path).ok()
    }

    fn write(&self, level: LogLevel, component: &str, message: &str) {
        if level < self.min_level {
            return;
        }

        let mut guard = self.file.lock();
        if let Some(file) = guard.as_mut() {
            let timestamp = SystemTime::now()
                .duration_since(SystemTime::UNIX_EPOCH)
                .map(|d| {
                    let secs = d.as_secs();
                    let millis = d.subsec_millis();
                    let hours = (secs % 86400) / 3600;
                    let mins = (secs % 3600) / 60;
                    let secs = secs % 60;
                    format!("{:02}:{:02}:{:02}.{:03}", hours, mins, secs, millis)
                })
                .unwrap_or_else(|_| "??:??:??.???".to_string());

            let _ = writeln!(file, "[{}] [{}] [{}] {}", timestamp, level, component, message);
            let _ = file.flush();
        }
    }
}

impl std::fmt::Debug for FileLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileLogger")
            .field("path", &self.path)
            .field("min_level", &self.min_level)
            .finish()
    }
}

impl Logger for FileLogger {
    fn debug(&self, component: &str, message: &str) {
        self.write(LogLevel::Debug, component, message);
    }

    fn info(&self, component: &str, message: &str) {
        self.write(LogLevel::Info, component, message);
    }

    fn warn(&self, component: &str, message: &str) {
        self.write(LogLevel::Warn, component, message);
    }

    fn error(&self, component: &str, message: &str) {
        self.write(LogLevel::Error, component, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_log_levels() {
        assert!(LogLevel::Info > LogLevel::Debug);
        assert!(LogLevel::Warn > LogLevel::Info);
        assert!(LogLevel::Error > LogLevel::Warn);
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(LogLevel::parse("WARN"), LogLevel::Warn);
        assert_eq!(LogLevel::parse(" error "), LogLevel::Error);
        assert_eq!(LogLevel::parse("verbose"), LogLevel::Debug);
    }

    #[test]
    fn test_file_logger_writes_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("debug.log");
        let logger = FileLogger::new(&path, LogLevel::Debug);

        logger.debug("SecretResolver", "cache miss for 'keyA'");
        logger.warn("SecretResolver", "backend unavailable");

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("[DEBUG] [SecretResolver] cache miss for 'keyA'"));
        assert!(content.contains("[WARN ] [SecretResolver] backend unavailable"));
    }

    #[test]
    fn test_file_logger_respects_min_level() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("debug.log");
        let logger = FileLogger::new(&path, LogLevel::Warn);

        logger.debug("test", "hidden");
        logger.error("test", "shown");

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(!content.contains("hidden"));
        assert!(content.contains("shown"));
    }

    #[test]
    fn test_clear() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("debug.log");
        let logger = FileLogger::new(&path, LogLevel::Debug);

        logger.info("test", "before");
        logger.clear();
        logger.info("test", "after");

        let content = std::fs::read_to_string(logger.path()).unwrap();
        assert!(!content.contains("before"));
        assert!(content.contains("after"));
    }
}
