//! Console logger implementation

use super::traits::Logger;

/// A logger that outputs to the console (stdout/stderr)
#[derive(Debug, Clone)]
pub struct ConsoleLogger {
    prefix: String,
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleLogger {
    /// Create a new console logger with default prefix
    pub fn new() -> Self {
        Self {
            prefix: "[secretcache]".to_string(),
        }
    }

    /// Create a console logger with a custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Logger for ConsoleLogger {
    fn debug(&self, component: &str, message: &str) {
        eprintln!("{} DEBUG [{}] {}", self.prefix, component, message);
    }

    fn info(&self, component: &str, message: &str) {
        println!("{} INFO [{}] {}", self.prefix, component, message);
    }

    fn warn(&self, component: &str, message: &str) {
        eprintln!("{} WARN [{}] {}", self.prefix, component, message);
    }

    fn error(&self, component: &str, message: &str) {
        eprintln!("{} ERROR [{}] {}", self.prefix, component, message);
    }
}
