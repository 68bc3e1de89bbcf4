//! Symmetric encryption under a caller-supplied shared secret
//!
//! Byte payloads are framed as `IV || ciphertext`; string payloads as
//! `encode(ciphertext) '|' encode(IV)`. See [`crate::framing`].

use crate::config::CryptoConfig;
use crate::encoding::ByteEncoding;
use crate::error::{CryptoError, CryptoResult};
use crate::framing;
use crate::secret::Secret;
use crate::service::Encryption;
use crate::symmetric;
use std::sync::Arc;

/// Encrypts and decrypts bytes, strings and files with one 256-bit secret
///
/// Once [`dispose`](Self::dispose) has been called the secret is wiped and
/// every operation fails with [`CryptoError::Disposed`].
#[derive(Debug)]
pub struct SharedSecretEncryptionService {
    secret: Option<Secret>,
    config: Arc<CryptoConfig>,
}

impl SharedSecretEncryptionService {
    /// Generate a new random secret, base64 encoded
    pub fn generate_new_secret() -> String {
        Secret::generate().as_base64().to_string()
    }

    /// Create a service from a base64-encoded 32-byte secret
    pub fn new(secret_base64: &str) -> CryptoResult<Self> {
        Self::from_secret(Secret::from_base64(secret_base64)?)
    }

    /// Create a service from an already secured secret
    pub fn from_secret(secret: Secret) -> CryptoResult<Self> {
        secret.expose_key()?;
        Ok(Self {
            secret: Some(secret),
            config: Arc::new(CryptoConfig::default()),
        })
    }

    pub fn with_config(mut self, config: Arc<CryptoConfig>) -> Self {
        self.config = config;
        self
    }

    /// Wipe the secret; later operations fail with [`CryptoError::Disposed`]
    pub fn dispose(&mut self) {
        if self.secret.take().is_some() {
            log::debug!("Shared secret service disposed");
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.secret.is_none()
    }

    fn secret(&self) -> CryptoResult<&Secret> {
        self.secret.as_ref().ok_or(CryptoError::Disposed)
    }
}

impl Encryption for SharedSecretEncryptionService {
    fn encrypt_bytes(&self, plaintext: &[u8]) -> CryptoResult<Vec<u8>> {
        let key = self.secret()?.expose_key()?;
        let block = symmetric::encrypt(plaintext, &key)?;
        Ok(framing::frame_secret(&block))
    }

    fn decrypt_bytes(&self, payload: &[u8]) -> CryptoResult<Vec<u8>> {
        let key = self.secret()?.expose_key()?;
        let block = framing::split_secret(payload)?;
        symmetric::decrypt(&block, &key)
    }

    fn encrypt_string(&self, text: &str, encoding: ByteEncoding) -> CryptoResult<String> {
        let key = self.secret()?.expose_key()?;
        let block = symmetric::encrypt(text.as_bytes(), &key)?;
        Ok(framing::join_secret_string(&block, encoding))
    }

    fn decrypt_string(&self, text: &str, encoding: ByteEncoding) -> CryptoResult<String> {
        let key = self.secret()?.expose_key()?;
        let block = framing::split_secret_string(text, encoding)?;
        let plaintext = symmetric::decrypt(&block, &key)?;
        String::from_utf8(plaintext)
            .map_err(|_| CryptoError::format("Decrypted payload is not valid UTF-8"))
    }

    fn config(&self) -> &CryptoConfig {
        &self.config
    }
}
