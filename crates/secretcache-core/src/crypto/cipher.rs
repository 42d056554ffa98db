//! Encrypt/decrypt of cache values

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use super::{CryptoContext, CryptoError};

/// Encrypt `plaintext` under the context's key and IV, returning base64 text
///
/// The IV is fixed, so equal plaintexts yield equal ciphertexts.
pub fn encrypt(plaintext: &str, ctx: &CryptoContext) -> Result<String, CryptoError> {
    let cipher = Aes256Gcm::new_from_slice(ctx.key())
        .map_err(|e| CryptoError::InvalidKeyMaterial(e.to_string()))?;
    let nonce = Nonce::from_slice(ctx.iv());

    let ciphertext = cipher
        .encrypt(nonce, plaintext.as_bytes())
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

    Ok(STANDARD.encode(ciphertext))
}

/// Reverse of [`encrypt`]
pub fn decrypt(ciphertext: &str, ctx: &CryptoContext) -> Result<String, CryptoError> {
    let bytes = STANDARD
        .decode(ciphertext)
        .map_err(|e| CryptoError::DecryptionFailed(format!("invalid base64: {}", e)))?;

    let cipher = Aes256Gcm::new_from_slice(ctx.key())
        .map_err(|e| CryptoError::InvalidKeyMaterial(e.to_string()))?;
    let nonce = Nonce::from_slice(ctx.iv());

    let plaintext = cipher
        .decrypt(nonce, bytes.as_ref())
        .map_err(|e| CryptoError::DecryptionFailed(e.to_string()))?;

    String::from_utf8(plaintext).map_err(|e| CryptoError::DecryptionFailed(e.to_string()))
}
