//! Logger trait definition

use std::sync::Arc;

/// Logger abstraction used by the resolver and its backends
///
/// Every entry carries a `component` tag (e.g. `"SecretResolver"`,
/// `"AwsSecretsManagerBackend"`) so that host applications can route or
/// filter diagnostics without parsing messages.
///
/// Implementations:
/// - `NoOpLogger`: Silent logger
/// - `ConsoleLogger`: Logs to stdout/stderr
/// - `FileLogger`: Appends to a debug log file
/// - `MemoryLogger`: Captures entries in memory
pub trait Logger: Send + Sync {
    /// Log a debug message
    fn debug(&self, component: &str, message: &str);

    /// Log an info message
    fn info(&self, component: &str, message: &str);

    /// Log a warning message
    fn warn(&self, component: &str, message: &str);

    /// Log an error message
    fn error(&self, component: &str, message: &str);
}

/// Type alias for an Arc-wrapped logger
pub type SharedLogger = Arc<dyn Logger>;

/// Convenience macro for logging with format arguments
#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $component:expr, $($arg:tt)*) => {
        $logger.debug($component, &format!($($arg)*))
    };
}
