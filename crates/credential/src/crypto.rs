//! Key derivation and AES-128-GCM sealing for stored passwords.
//!
//! Wire format of a sealed secret: standard base64 of
//! `nonce (12 bytes) || ciphertext || tag (16 bytes)`.

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes128Gcm, Key, Nonce};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::CryptoError;
use crate::secure::SecureString;

/// AES-GCM nonce length in bytes.
pub const NONCE_LEN: usize = 12;
/// AES-GCM authentication tag length in bytes.
pub const TAG_LEN: usize = 16;
/// Derived key length in bytes (AES-128).
pub const KEY_LEN: usize = 16;

/// A 16-byte AES key. Zeroized on drop; never printed.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct EncryptionKey([u8; KEY_LEN]);

impl EncryptionKey {
    /// Wrap raw key bytes.
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl PartialEq for EncryptionKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl Eq for EncryptionKey {}

impl std::fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("EncryptionKey([REDACTED])")
    }
}

/// Derive the per-record key from a correlation id and a seed.
///
/// SHA-256 over `id || seed`, truncated to 16 bytes. Pure: the same inputs
/// always produce the same key.
pub fn derive_key(id: &str, seed: &str) -> EncryptionKey {
    let mut hasher = Sha256::new();
    hasher.update(id.as_bytes());
    hasher.update(seed.as_bytes());
    let digest = hasher.finalize();

    let mut key = [0u8; KEY_LEN];
    key.copy_from_slice(&digest[..KEY_LEN]);
    EncryptionKey(key)
}

fn cipher(key: &EncryptionKey) -> Aes128Gcm {
    Aes128Gcm::new(Key::<Aes128Gcm>::from_slice(key.as_bytes()))
}

/// Seal `plaintext` under `key` with a fresh random nonce.
pub fn encrypt(key: &EncryptionKey, plaintext: &str) -> Result<String, CryptoError> {
    let nonce = Aes128Gcm::generate_nonce(&mut OsRng);
    let sealed = cipher(key)
        .encrypt(&nonce, plaintext.as_bytes())
        .map_err(|_| CryptoError::EncryptionFailed)?;

    let mut blob = Vec::with_capacity(NONCE_LEN + sealed.len());
    blob.extend_from_slice(&nonce);
    blob.extend_from_slice(&sealed);
    Ok(STANDARD.encode(blob))
}

/// Open a sealed secret. Either the whole plaintext is recovered or an
/// error is returned; there is no partial result.
pub fn decrypt(key: &EncryptionKey, ciphertext: &str) -> Result<SecureString, CryptoError> {
    let blob = STANDARD
        .decode(ciphertext.trim())
        .map_err(|_| CryptoError::MalformedCiphertext("invalid base64"))?;
    if blob.len() < NONCE_LEN + TAG_LEN {
        return Err(CryptoError::MalformedCiphertext("too short"));
    }

    let (nonce, sealed) = blob.split_at(NONCE_LEN);
    let plain = cipher(key)
        .decrypt(Nonce::from_slice(nonce), sealed)
        .map_err(|_| CryptoError::DecryptionFailed)?;

    match String::from_utf8(plain) {
        Ok(text) => Ok(SecureString::from(text)),
        Err(err) => {
            err.into_bytes().zeroize();
            Err(CryptoError::MalformedCiphertext("plaintext is not utf-8"))
        }
    }
}
