//! Verbose-gated diagnostics

use std::sync::Arc;

use super::noop::NoOpLogger;
use super::traits::SharedLogger;

/// Logger handle plus the process-wide verbose flag
///
/// Entries are only forwarded when verbose output is enabled. Correctness
/// never depends on logging.
#[derive(Clone)]
pub struct Diagnostics {
    logger: SharedLogger,
    verbose: bool,
}

impl Diagnostics {
    pub fn new(logger: SharedLogger, verbose: bool) -> Self {
        Self { logger, verbose }
    }

    /// Diagnostics that drop everything
    pub fn silent() -> Self {
        Self::new(Arc::new(NoOpLogger::new()), false)
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn logger(&self) -> &SharedLogger {
        &self.logger
    }

    pub fn debug(&self, component: &str, message: &str) {
        if self.verbose {
            self.logger.debug(component, message);
        }
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::silent()
    }
}

impl std::fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Diagnostics")
            .field("verbose", &self.verbose)
            .finish_non_exhaustive()
    }
}
