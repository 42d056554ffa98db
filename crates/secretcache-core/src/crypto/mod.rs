//! Obfuscation of cached secret values
//!
//! Cached values are kept as AES-256-GCM ciphertext under a process-wide
//! key and IV. This guards against casual memory inspection and accidental
//! logging of the cache; it is not a boundary against a privileged attacker.

mod context;
mod cipher;

pub use context::{CryptoContext, KEY_LEN, IV_LEN};
pub use cipher::{encrypt, decrypt};

use thiserror::Error;

/// Errors raised by the cache cipher
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("Invalid key material: {0}")]
    InvalidKeyMaterial(String),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),
}
