//! Common contract of the encryption services

use crate::config::CryptoConfig;
use crate::encoding::ByteEncoding;
use crate::error::CryptoResult;
use crate::files;
use std::path::Path;

/// Bytes, string and file encryption under one key source
///
/// Implemented by [`SharedSecretEncryptionService`](crate::SharedSecretEncryptionService)
/// and [`HybridCertificateEncryptionService`](crate::HybridCertificateEncryptionService).
pub trait Encryption {
    fn encrypt_bytes(&self, plaintext: &[u8]) -> CryptoResult<Vec<u8>>;

    fn decrypt_bytes(&self, payload: &[u8]) -> CryptoResult<Vec<u8>>;

    fn encrypt_string(&self, text: &str, encoding: ByteEncoding) -> CryptoResult<String>;

    fn decrypt_string(&self, text: &str, encoding: ByteEncoding) -> CryptoResult<String>;

    fn config(&self) -> &CryptoConfig;

    /// [`encrypt_string`](Encryption::encrypt_string) with the configured default encoding
    fn encrypt_text(&self, text: &str) -> CryptoResult<String> {
        self.encrypt_string(text, self.config().default_encoding)
    }

    /// [`decrypt_string`](Encryption::decrypt_string) with the configured default encoding
    fn decrypt_text(&self, text: &str) -> CryptoResult<String> {
        self.decrypt_string(text, self.config().default_encoding)
    }

    /// Encrypt the whole of `input` into `output` using the byte framing
    fn encrypt_file(&self, input: &Path, output: &Path) -> CryptoResult<()> {
        let warn_above = self.config().large_file_warning_bytes;
        files::transform_file(input, output, warn_above, |bytes| self.encrypt_bytes(bytes))
    }

    /// Decrypt a file produced by [`Encryption::encrypt_file`]
    fn decrypt_file(&self, input: &Path, output: &Path) -> CryptoResult<()> {
        let warn_above = self.config().large_file_warning_bytes;
        files::transform_file(input, output, warn_above, |bytes| self.decrypt_bytes(bytes))
    }
}
