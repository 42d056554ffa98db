//! Logging abstractions
//!
//! The resolver and backends log through a `Logger` wrapped in
//! `Diagnostics`, which drops debug output unless verbose mode is on.

mod traits;
mod noop;
mod console;
mod memory;
mod diagnostics;
pub mod file_logger;

pub use traits::{Logger, SharedLogger};
pub use noop::NoOpLogger;
pub use console::ConsoleLogger;
pub use memory::{LogEntry, MemoryLogger};
pub use diagnostics::Diagnostics;
pub use file_logger::{FileLogger, LogLevel};
