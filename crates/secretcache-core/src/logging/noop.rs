//! No-op logger implementation

use super::traits::Logger;

/// A logger that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpLogger;

impl NoOpLogger {
    /// Create a new no-op logger
    pub fn new() -> Self {
        Self
    }
}

impl Logger for NoOpLogger {
    fn debug(&self, _component: &str, _message: &str) {}
    fn info(&self, _component: &str, _message: &str) {}
    fn warn(&self, _component: &str, _message: &str) {}
    fn error(&self, _component: &str, _message: &str) {}
}
