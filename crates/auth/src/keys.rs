use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use rand::RngCore;
use rand::rngs::OsRng;
use thiserror::Error;

/// Minimum accepted key length in bytes. HMAC-SHA256 keys shorter than the
/// hash output weaken the signature.
pub const MIN_KEY_BYTES: usize = 32;

/// How a signing key was obtained. Ephemeral keys live for one process, so
/// every token dies with the process that minted it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMode {
    Ephemeral,
    Durable,
}

/// Secret used to sign and verify access tokens.
#[derive(Clone)]
pub struct SigningKey {
    bytes: Vec<u8>,
    mode: KeyMode,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("signing key is not valid base64")]
    InvalidEncoding,
    #[error("signing key must be at least {MIN_KEY_BYTES} bytes")]
    TooWeak,
}

impl SigningKey {
    /// Generates a fresh random key for this process.
    pub fn generate() -> Self {
        let mut bytes = vec![0u8; MIN_KEY_BYTES];
        OsRng.fill_bytes(&mut bytes);
        Self {
            bytes,
            mode: KeyMode::Ephemeral,
        }
    }

    /// Loads a durable key from operator-supplied base64.
    pub fn from_base64(encoded: &str) -> Result<Self, KeyError> {
        let bytes = BASE64
            .decode(encoded.trim())
            .map_err(|_| KeyError::InvalidEncoding)?;
        Self::from_bytes(bytes)
    }

    /// Builds a durable key from raw bytes.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self, KeyError> {
        let bytes = bytes.into();
        if bytes.len() < MIN_KEY_BYTES {
            return Err(KeyError::TooWeak);
        }
        Ok(Self {
            bytes,
            mode: KeyMode::Durable,
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mode(&self) -> KeyMode {
        self.mode
    }

    /// Encodes the key for storage, e.g. to turn a generated key into a
    /// durable one.
    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.bytes)
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("mode", &self.mode)
            .field("len", &self.bytes.len())
            .finish_non_exhaustive()
    }
}
