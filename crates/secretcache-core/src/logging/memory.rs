//! In-memory logger that captures entries

use parking_lot::Mutex;

use super::file_logger::LogLevel;
use super::traits::Logger;

/// A captured log entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub component: String,
    pub message: String,
}

/// Logger that keeps every entry in memory
///
/// Handy for tests and for hosts that want to surface resolver diagnostics
/// in their own report.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all captured entries
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().clone()
    }

    /// Whether any entry message contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.entries.lock().iter().any(|e| e.message.contains(needle))
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&self, level: LogLevel, component: &str, message: &str) {
        self.entries.lock().push(LogEntry {
            level,
            component: component.to_string(),
            message: message.to_string(),
        });
    }
}

impl Logger for MemoryLogger {
    fn debug(&self, component: &str, message: &str) {
        self.push(LogLevel::Debug, component, message);
    }

    fn info(&self, component: &str, message: &str) {
        self.push(LogLevel::Info, component, message);
    }

    fn warn(&self, component: &str, message: &str) {
        self.push(LogLevel::Warn, component, message);
    }

    fn error(&self, component: &str, message: &str) {
        self.push(LogLevel::Error, component, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_logger_captures() {
        let logger = MemoryLogger::new();
        assert!(logger.is_empty());

        logger.debug("backend", "looking up mftf/vendor/key");
        logger.error("backend", "boom");

        let entries = logger.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].level, LogLevel::Debug);
        assert_eq!(entries[0].component, "backend");
        assert_eq!(entries[1].level, LogLevel::Error);
        assert!(logger.contains("mftf/vendor/key"));
        assert!(!logger.contains("nothing"));
    }
}
