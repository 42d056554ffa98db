//! Namespaced secret keys

use std::fmt;
use std::str::FromStr;

use super::traits::LookupFailure;

/// Default namespace prefix for secret identifiers
pub const DEFAULT_NAMESPACE_PREFIX: &str = "mftf";

/// A caller key split into `vendor` and `subkey`
///
/// Parsing trims surrounding whitespace, then `/` from both ends, and splits
/// on the first remaining `/`. A key without a separator is malformed; no
/// default vendor is assumed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SecretKey {
    vendor: String,
    subkey: String,
}

impl SecretKey {
    pub fn new(vendor: impl Into<String>, subkey: impl Into<String>) -> Self {
        Self {
            vendor: vendor.into(),
            subkey: subkey.into(),
        }
    }

    /// Parse a raw caller key such as `" /vendor1/keyA/ "`
    pub fn parse(raw: &str) -> Result<Self, LookupFailure> {
        let trimmed = raw.trim().trim_matches('/');
        match trimmed.split_once('/') {
            Some((vendor, subkey)) if !vendor.is_empty() && !subkey.is_empty() => {
                Ok(Self::new(vendor, subkey))
            }
            _ => Err(LookupFailure::MalformedKey(raw.to_string())),
        }
    }

    pub fn vendor(&self) -> &str {
        &self.vendor
    }

    /// The portion after the vendor; also the cache key
    pub fn subkey(&self) -> &str {
        &self.subkey
    }

    /// Backend identifier `{prefix}/{vendor}/{subkey}`
    ///
    /// An empty prefix yields `{vendor}/{subkey}`.
    pub fn identifier(&self, prefix: &str) -> String {
        let prefix = prefix.trim_matches('/');
        if prefix.is_empty() {
            format!("{}/{}", self.vendor, self.subkey)
        } else {
            format!("{}/{}/{}", prefix, self.vendor, self.subkey)
        }
    }
}

impl fmt::Display for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.vendor, self.subkey)
    }
}

impl FromStr for SecretKey {
    type Err = LookupFailure;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
