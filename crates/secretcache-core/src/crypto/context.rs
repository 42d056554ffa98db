//! Process-wide key and IV

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::CryptoError;

/// Key length (AES-256)
pub const KEY_LEN: usize = 32;

/// IV length (GCM nonce)
pub const IV_LEN: usize = 12;

/// Symmetric key and IV shared by every encrypt/decrypt in the process
///
/// Created once at startup and shared behind an `Arc`. Replacing it while
/// the cache is populated makes existing entries undecryptable.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct CryptoContext {
    key: [u8; KEY_LEN],
    iv: [u8; IV_LEN],
}

impl CryptoContext {
    pub fn new(key: [u8; KEY_LEN], iv: [u8; IV_LEN]) -> Self {
        Self { key, iv }
    }

    /// Build a context from base64-encoded key and IV (as found in config)
    pub fn from_base64(key: &str, iv: &str) -> Result<Self, CryptoError> {
        let key = decode_exact::<KEY_LEN>("key", key)?;
        let iv = decode_exact::<IV_LEN>("iv", iv)?;
        Ok(Self::new(key, iv))
    }

    /// Fresh random key and IV
    pub fn generate() -> Self {
        let mut key = [0u8; KEY_LEN];
        let mut iv = [0u8; IV_LEN];
        let mut rng = rand::thread_rng();
        rng.fill_bytes(&mut key);
        rng.fill_bytes(&mut iv);
        Self::new(key, iv)
    }

    pub(crate) fn key(&self) -> &[u8; KEY_LEN] {
        &self.key
    }

    pub(crate) fn iv(&self) -> &[u8; IV_LEN] {
        &self.iv
    }
}

fn decode_exact<const N: usize>(field: &str, encoded: &str) -> Result<[u8; N], CryptoError> {
    let mut bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| CryptoError::InvalidKeyMaterial(format!("{} is not valid base64: {}", field, e)))?;

    if bytes.len() != N {
        let len = bytes.len();
        bytes.zeroize();
        return Err(CryptoError::InvalidKeyMaterial(format!(
            "{} must be {} bytes, got {}",
            field, N, len
        )));
    }

    let mut out = [0u8; N];
    out.copy_from_slice(&bytes);
    bytes.zeroize();
    Ok(out)
}

impl std::fmt::Debug for CryptoContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CryptoContext { .. }")
    }
}
