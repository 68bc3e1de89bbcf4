//! Shared secret key material

use crate::error::{CryptoError, CryptoResult};
use crate::symmetric::{self, KEY_LENGTH};
use base64::{engine::general_purpose, Engine as _};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// 256-bit AES key kept as base64 text and zeroized on drop
///
/// The key is decoded only on demand into a [`Zeroizing`] buffer that is wiped
/// when the caller lets go of it.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Secret {
    encoded: String,
}

impl Secret {
    /// Generate a fresh random key
    pub fn generate() -> Self {
        let key = symmetric::generate_key();
        Self {
            encoded: general_purpose::STANDARD.encode(key.as_ref()),
        }
    }

    /// Wrap a base64-encoded key, validating that it decodes to 32 bytes
    pub fn from_base64(encoded: &str) -> CryptoResult<Self> {
        let secret = Self {
            encoded: encoded.trim().to_string(),
        };
        secret.expose_key()?;
        Ok(secret)
    }

    /// Wrap raw key bytes; must be exactly 32 bytes
    pub fn from_bytes(bytes: &[u8]) -> CryptoResult<Self> {
        check_length(bytes.len())?;
        Ok(Self {
            encoded: general_purpose::STANDARD.encode(bytes),
        })
    }

    /// Base64 form of the key (careful - this exposes sensitive data)
    pub fn as_base64(&self) -> &str {
        &self.encoded
    }

    /// Decode the key into a buffer that is zeroized when dropped
    pub fn expose_key(&self) -> CryptoResult<Zeroizing<Vec<u8>>> {
        let key = Zeroizing::new(general_purpose::STANDARD.decode(&self.encoded).map_err(|_| {
            CryptoError::InvalidKey {
                message: "Secret is not valid base64".to_string(),
            }
        })?);
        check_length(key.len())?;
        Ok(key)
    }
}

fn check_length(len: usize) -> CryptoResult<()> {
    if len != KEY_LENGTH {
        return Err(CryptoError::InvalidKey {
            message: format!("Secret must be {} bytes, got {}", KEY_LENGTH, len),
        });
    }
    Ok(())
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secret")
            .field("encoded", &"[REDACTED]")
            .finish()
    }
}
