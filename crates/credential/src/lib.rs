//! # opsdeck Credential
//!
//! Recovery of stored secrets for actions that need them.
//!
//! A stored password is sealed with AES-128-GCM under a key derived from
//! the record's correlation id and seed ([`derive_key`]). Recovered
//! plaintext only ever lives in a [`SecureString`], which redacts itself in
//! `Debug`/`Display` and zeroizes on drop.
//!
//! ## Stored format
//!
//! Ciphertexts are `base64(nonce(12) || AES-128-GCM(plaintext) || tag(16))`
//! and the key is the first 16 bytes of SHA-256 over the id then the seed.
//! This is not compatible with passwords sealed by earlier MD5-keyed,
//! unauthenticated AES tooling: such values always fail with
//! [`CryptoError::DecryptionFailed`] (or `MalformedCiphertext` when too
//! short) and must be re-sealed with [`AesGcmCodec::seal`].
//!
//! ```rust
//! use opsdeck_credential::{AesGcmCodec, CredentialCodec};
//!
//! let codec = AesGcmCodec;
//! let sealed = codec.seal("g1", "s1", "db-password").unwrap();
//! let password = codec.recover("g1", "s1", &sealed).unwrap();
//! assert_eq!(password.expose(), "db-password");
//! assert_eq!(password.to_string(), "[REDACTED]");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Pluggable codec trait and the default AES-GCM implementation.
pub mod codec;
pub mod crypto;
/// Cryptographic error type.
pub mod error;
pub mod secure;

pub use codec::{AesGcmCodec, CredentialCodec};
pub use crypto::{EncryptionKey, decrypt, derive_key, encrypt};
pub use error::CryptoError;
pub use secure::SecureString;
