//! Hybrid RSA/AES encryption under a certificate
//!
//! Bulk data is encrypted with a fresh AES-256 key per call; that key is
//! wrapped with RSA-OAEP (SHA-1) under the certificate's public key. Short
//! strings skip the symmetric layer and are RSA-encrypted directly.
//!
//! Formats:
//!
//! - bytes: `IV(16) || wrapped key(K) || ciphertext`, K = modulus size in bytes
//! - short string: `"R_" || encode(RSA ciphertext)`
//! - long string: `encode(IV || wrapped key || ciphertext)`
//! - legacy string (decrypt only): `encode(IV) '|' encode(wrapped key) '|' encode(ciphertext)`

use crate::certificate::CertificateKeyContext;
use crate::config::CryptoConfig;
use crate::encoding::ByteEncoding;
use crate::error::{CryptoError, CryptoResult};
use crate::framing;
use crate::service::Encryption;
use crate::symmetric::{self, EncryptedBlock};
use rand::rngs::OsRng;
use rsa::Oaep;
use sha1::Sha1;
use std::sync::Arc;
use zeroize::Zeroizing;

/// Marker for strings that were RSA-encrypted directly
pub const DIRECT_PREFIX: &str = "R_";

/// OAEP padding overhead with SHA-1: two digests plus two bytes
const OAEP_SHA1_OVERHEAD: usize = 2 * 20 + 2;

fn oaep() -> Oaep {
    Oaep::new::<Sha1>()
}

/// Encrypts with a certificate's public key and decrypts with its private key
#[derive(Debug, Clone)]
pub struct HybridCertificateEncryptionService {
    context: Arc<CertificateKeyContext>,
    config: Arc<CryptoConfig>,
}

impl HybridCertificateEncryptionService {
    pub fn new(context: Arc<CertificateKeyContext>) -> Self {
        Self {
            context,
            config: Arc::new(CryptoConfig::default()),
        }
    }

    pub fn with_config(mut self, config: Arc<CryptoConfig>) -> Self {
        self.config = config;
        self
    }

    pub fn context(&self) -> &CertificateKeyContext {
        &self.context
    }

    /// Strings whose UTF-8 length is strictly below this take the direct RSA path
    pub fn max_direct_length(&self) -> usize {
        self.context.modulus_size().saturating_sub(OAEP_SHA1_OVERHEAD)
    }

    fn wrap_key(&self, key: &[u8]) -> CryptoResult<Vec<u8>> {
        Ok(self.context.public_key().encrypt(&mut OsRng, oaep(), key)?)
    }

    fn unwrap_key(&self, wrapped: &[u8]) -> CryptoResult<Zeroizing<Vec<u8>>> {
        let private_key = self.context.private_key()?;
        let key = private_key
            .decrypt_blinded(&mut OsRng, oaep(), wrapped)
            .map_err(|e| CryptoError::operation(format!("Cannot unwrap content key: {}", e)))?;
        Ok(Zeroizing::new(key))
    }

    fn decrypt_block(&self, wrapped_key: &[u8], block: &EncryptedBlock) -> CryptoResult<Vec<u8>> {
        let key = self.unwrap_key(wrapped_key)?;
        symmetric::decrypt(block, &key)
    }

    fn encrypt_direct(&self, plaintext: &[u8]) -> CryptoResult<Vec<u8>> {
        Ok(self.context.public_key().encrypt(&mut OsRng, oaep(), plaintext)?)
    }

    fn decrypt_direct(&self, ciphertext: &[u8]) -> CryptoResult<Vec<u8>> {
        let private_key = self.context.private_key()?;
        private_key
            .decrypt_blinded(&mut OsRng, oaep(), ciphertext)
            .map_err(|e| CryptoError::operation(format!("RSA decryption failed: {}", e)))
    }
}

fn into_string(bytes: Vec<u8>) -> CryptoResult<String> {
    String::from_utf8(bytes).map_err(|_| CryptoError::format("Decrypted payload is not valid UTF-8"))
}

impl Encryption for HybridCertificateEncryptionService {
    fn encrypt_bytes(&self, plaintext: &[u8]) -> CryptoResult<Vec<u8>> {
        let key = symmetric::generate_key();
        let block = symmetric::encrypt(plaintext, key.as_ref())?;
        let wrapped_key = self.wrap_key(key.as_ref())?;

        log::debug!(
            "Hybrid encrypted {} bytes with {}-byte wrapped key",
            plaintext.len(),
            wrapped_key.len()
        );
        Ok(framing::frame_hybrid(
            block.iv(),
            &wrapped_key,
            block.ciphertext(),
        ))
    }

    fn decrypt_bytes(&self, payload: &[u8]) -> CryptoResult<Vec<u8>> {
        self.context.private_key()?;
        let frame = framing::split_hybrid(payload, self.context.modulus_size())?;
        self.decrypt_block(frame.wrapped_key, &frame.to_block()?)
    }

    fn encrypt_string(&self, text: &str, encoding: ByteEncoding) -> CryptoResult<String> {
        let plaintext = text.as_bytes();
        if plaintext.len() < self.max_direct_length() {
            let ciphertext = self.encrypt_direct(plaintext)?;
            log::debug!("RSA encrypted {} bytes directly", plaintext.len());
            return Ok(format!("{}{}", DIRECT_PREFIX, encoding.encode(&ciphertext)));
        }
        Ok(encoding.encode(&self.encrypt_bytes(plaintext)?))
    }

    fn decrypt_string(&self, text: &str, encoding: ByteEncoding) -> CryptoResult<String> {
        self.context.private_key()?;

        if let Some(encoded) = text.strip_prefix(DIRECT_PREFIX) {
            let ciphertext = encoding.decode(encoded)?;
            return into_string(self.decrypt_direct(&ciphertext)?);
        }

        if text.contains(framing::SEPARATOR) {
            let (wrapped_key, block) = framing::split_legacy_hybrid_string(text, encoding)?;
            return into_string(self.decrypt_block(&wrapped_key, &block)?);
        }

        let payload = encoding.decode(text)?;
        into_string(self.decrypt_bytes(&payload)?)
    }

    fn config(&self) -> &CryptoConfig {
        &self.config
    }
}
