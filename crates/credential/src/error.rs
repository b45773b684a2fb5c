use thiserror::Error;

/// Cryptographic operation errors.
///
/// Messages describe the failure class only; they never include key
/// material, ciphertext or recovered plaintext.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// The ciphertext is not well-formed (bad base64, truncated, or the
    /// plaintext is not UTF-8).
    #[error("malformed ciphertext: {0}")]
    MalformedCiphertext(&'static str),

    /// Authentication failed: wrong key or tampered data.
    #[error("decryption failed - invalid key or corrupted data")]
    DecryptionFailed,

    /// Encryption failed.
    #[error("encryption failed")]
    EncryptionFailed,
}
