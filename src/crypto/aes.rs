//! AES-256-GCM encryption for session payloads
//!
//! Session records are stored in the master database as `nonce:ciphertext`
//! (both base64). The key is derived from the configured sessions password.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use rand::Rng;
use sha2::{Digest, Sha256, Sha512};
use thiserror::Error;

/// Encryption key for AES-256-GCM
#[derive(Clone)]
pub struct EncryptionKey {
    key: [u8; 32],
}

impl std::fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("EncryptionKey([REDACTED])")
    }
}

/// Encryption error types
#[derive(Error, Debug)]
pub enum EncryptionError {
    #[error("Invalid base64 encoding: {0}")]
    Base64Error(#[from] base64::DecodeError),

    #[error("Encryption failed")]
    EncryptionFailed,

    #[error("Decryption failed: invalid ciphertext or wrong key")]
    DecryptionFailed,

    #[error("Invalid ciphertext format")]
    InvalidCiphertextFormat,
}

impl EncryptionKey {
    /// Create a new encryption key from a 32-byte array
    pub fn new(key: [u8; 32]) -> Self {
        Self { key }
    }

    /// Derive the row encryption key from the sessions password (SHA-256)
    pub fn derive_from_password(password: &str) -> Self {
        let digest = Sha256::digest(password.as_bytes());
        let mut key = [0u8; 32];
        key.copy_from_slice(&digest);
        Self { key }
    }

    /// Get the raw key bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.key
    }
}

/// 64 bytes of cookie key material derived from the sessions password (SHA-512)
pub fn derive_cookie_key_material(password: &str) -> [u8; 64] {
    let digest = Sha512::digest(password.as_bytes());
    let mut material = [0u8; 64];
    material.copy_from_slice(&digest);
    material
}

/// Encrypt plaintext using AES-256-GCM
///
/// Returns base64-encoded ciphertext in format: nonce:ciphertext
pub fn encrypt(key: &EncryptionKey, plaintext: &str) -> Result<String, EncryptionError> {
    let cipher =
        Aes256Gcm::new_from_slice(&key.key).map_err(|_| EncryptionError::EncryptionFailed)?;

    let mut nonce_bytes = [0u8; 12];
    rand::thread_rng().fill(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext.as_bytes())
        .map_err(|_| EncryptionError::EncryptionFailed)?;

    Ok(format!(
        "{}:{}",
        BASE64.encode(nonce_bytes),
        BASE64.encode(&ciphertext)
    ))
}

/// Decrypt ciphertext that was encrypted with [encrypt]
pub fn decrypt(key: &EncryptionKey, encrypted: &str) -> Result<String, EncryptionError> {
    let (nonce_b64, ciphertext_b64) = encrypted
        .split_once(':')
        .ok_or(EncryptionError::InvalidCiphertextFormat)?;
    if ciphertext_b64.contains(':') {
        return Err(EncryptionError::InvalidCiphertextFormat);
    }

    let nonce_bytes = BASE64.decode(nonce_b64)?;
    if nonce_bytes.len() != 12 {
        return Err(EncryptionError::InvalidCiphertextFormat);
    }
    let ciphertext = BASE64.decode(ciphertext_b64)?;

    let cipher =
        Aes256Gcm::new_from_slice(&key.key).map_err(|_| EncryptionError::DecryptionFailed)?;

    let plaintext = cipher
        .decrypt(Nonce::from_slice(&nonce_bytes), ciphertext.as_ref())
        .map_err(|_| EncryptionError::DecryptionFailed)?;

    String::from_utf8(plaintext).map_err(|_| EncryptionError::DecryptionFailed)
}
