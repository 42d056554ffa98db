//! `.credentials` file secret backend

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;

use super::key::SecretKey;
use super::traits::{LookupFailure, LookupResult, SecretBackend, SecretsError, SecretsResult};
use crate::log_debug;
use crate::logging::Diagnostics;

const COMPONENT: &str = "FileBackend";

/// Backend reading a `.credentials` file of `vendor/key=value` lines
///
/// ```text
/// # comments and blank lines are ignored
/// magento/tfa/OTP_SHARED_SECRET=ABCDEFGHIJ
/// vendor1/keyA="quoted value"
/// ```
///
/// The file is read once, on first use. A missing file is not an error: every
/// lookup then reports not found.
pub struct FileBackend {
    path: PathBuf,
    entries: OnceCell<HashMap<String, String>>,
    diagnostics: Diagnostics,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>, diagnostics: Diagnostics) -> Self {
        Self {
            path: path.into(),
            entries: OnceCell::new(),
            diagnostics,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn entries(&self) -> SecretsResult<&HashMap<String, String>> {
        self.entries.get_or_try_init(|| {
            if !self.path.exists() {
                log_debug!(self.diagnostics, COMPONENT, "{} does not exist", self.path.display());
                return Ok(HashMap::new());
            }
            let content = fs::read_to_string(&self.path).map_err(|e| {
                SecretsError::configuration(format!("cannot read {}: {}", self.path.display(), e))
            })?;
            let entries = parse_credentials(&content);
            log_debug!(
                self.diagnostics,
                COMPONENT,
                "loaded {} entries from {}",
                entries.len(),
                self.path.display()
            );
            Ok(entries)
        })
    }
}

/// Parse `vendor/key=value` lines into a map keyed by normalized `vendor/key`
pub fn parse_credentials(content: &str) -> HashMap<String, String> {
    let mut entries = HashMap::new();
    for line in content.lines() {
        let line = line.trim();
        if line.starts_with('#') || line.is_empty() {
            continue;
        }
        if let Some((k, v)) = line.split_once('=') {
            let Ok(key) = SecretKey::parse(k) else {
                continue;
            };
            let value = v.trim().trim_matches('"').trim_matches('\'');
            entries.insert(key.to_string(), value.to_string());
        }
    }
    entries
}

impl std::fmt::Debug for FileBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileBackend")
            .field("path", &self.path)
            .field("loaded", &self.entries.get().is_some())
            .finish()
    }
}

impl SecretBackend for FileBackend {
    fn name(&self) -> &str {
        "file"
    }

    fn initialize(&self) -> SecretsResult<()> {
        self.entries().map(|_| ())
    }

    fn resolve(&self, key: &SecretKey) -> LookupResult {
        let id = key.to_string();
        let entries = self
            .entries()
            .map_err(|e| LookupFailure::transient(id.clone(), e.to_string()))?;

        match entries.get(&id) {
            Some(value) if !value.is_empty() => Ok(value.clone()),
            _ => Err(LookupFailure::not_found(id)),
        }
    }
}
