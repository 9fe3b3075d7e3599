//! Signing key material
//!
//! The session signing key is decoded once at startup and shared read-only
//! by every request afterwards. Construction fails rather than falling back
//! to a weak or empty key.

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine};
use jsonwebtoken::{DecodingKey, EncodingKey};

/// Immutable HMAC key used to sign and verify session tokens.
#[derive(Clone)]
pub struct SigningKey {
    key_bytes: Arc<[u8]>,
}

impl SigningKey {
    /// Minimum allowed key length in bytes (256 bits)
    pub const MIN_KEY_LENGTH: usize = 32;

    /// Create a key from raw bytes.
    ///
    /// # Errors
    /// Returns error if the key is empty or shorter than 32 bytes.
    pub fn new(key: impl AsRef<[u8]>) -> Result<Self, KeyError> {
        let key_bytes = key.as_ref();
        if key_bytes.is_empty() {
            return Err(KeyError::Missing);
        }
        if key_bytes.len() < Self::MIN_KEY_LENGTH {
            return Err(KeyError::KeyTooShort {
                actual: key_bytes.len(),
                minimum: Self::MIN_KEY_LENGTH,
            });
        }
        Ok(Self {
            key_bytes: Arc::from(key_bytes),
        })
    }

    /// Decode a key from its Base64 configuration form.
    ///
    /// Surrounding whitespace is ignored.
    ///
    /// # Errors
    /// Returns error if the value is blank, not valid Base64, or decodes to
    /// fewer than 32 bytes.
    pub fn from_base64(encoded: &str) -> Result<Self, KeyError> {
        let encoded = encoded.trim();
        if encoded.is_empty() {
            return Err(KeyError::Missing);
        }
        let bytes = STANDARD
            .decode(encoded)
            .map_err(|e| KeyError::InvalidBase64(e.to_string()))?;
        Self::new(bytes)
    }

    /// Key length in bytes
    pub fn len(&self) -> usize {
        self.key_bytes.len()
    }

    /// Always false for a constructed key; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.key_bytes.is_empty()
    }

    pub(crate) fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(&self.key_bytes)
    }

    pub(crate) fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(&self.key_bytes)
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey")
            .field("key_length", &self.key_bytes.len())
            .finish_non_exhaustive()
    }
}

/// Errors that can occur when loading the signing key
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    #[error("signing secret is not set")]
    Missing,

    #[error("signing secret is not valid Base64: {0}")]
    InvalidBase64(String),

    #[error("signing key too short: got {actual} bytes, need at least {minimum}")]
    KeyTooShort { actual: usize, minimum: usize },
}
