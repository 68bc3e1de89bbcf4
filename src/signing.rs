//! PKCS#1 v1.5 signatures with a certificate's RSA key

use crate::certificate::CertificateKeyContext;
use crate::config::CryptoConfig;
use crate::encoding::{ByteEncoding, TextEncoding};
use crate::error::{CryptoError, CryptoResult};
use crate::hash::{self, HashAlgorithm};
use rand::rngs::OsRng;
use rsa::Pkcs1v15Sign;
use sha1::Sha1;
use sha2::{Sha256, Sha384, Sha512};
use std::sync::Arc;

/// Hash, signature encoding and text encoding for the string signing APIs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SignOptions {
    pub hash: HashAlgorithm,
    pub encoding: ByteEncoding,
    pub text_encoding: TextEncoding,
}

impl SignOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options taking hash and signature encoding from the configured defaults
    pub fn from_config(config: &CryptoConfig) -> Self {
        Self::default()
            .with_hash(config.default_hash)
            .with_encoding(config.default_encoding)
    }

    pub fn with_hash(mut self, hash: HashAlgorithm) -> Self {
        self.hash = hash;
        self
    }

    pub fn with_encoding(mut self, encoding: ByteEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_text_encoding(mut self, text_encoding: TextEncoding) -> Self {
        self.text_encoding = text_encoding;
        self
    }
}

fn scheme(algorithm: HashAlgorithm) -> CryptoResult<Pkcs1v15Sign> {
    match algorithm {
        HashAlgorithm::Sha1 => Ok(Pkcs1v15Sign::new::<Sha1>()),
        HashAlgorithm::Sha256 => Ok(Pkcs1v15Sign::new::<Sha256>()),
        HashAlgorithm::Sha384 => Ok(Pkcs1v15Sign::new::<Sha384>()),
        HashAlgorithm::Sha512 => Ok(Pkcs1v15Sign::new::<Sha512>()),
        HashAlgorithm::Md5 => Err(CryptoError::UnsupportedAlgorithm {
            algorithm: format!("{} signatures", algorithm),
        }),
    }
}

/// Signs with the private key and verifies with the public key of one certificate
#[derive(Debug, Clone)]
pub struct CertificateSignService {
    context: Arc<CertificateKeyContext>,
}

impl CertificateSignService {
    pub fn new(context: Arc<CertificateKeyContext>) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &CertificateKeyContext {
        &self.context
    }

    /// Sign the digest of `data`
    pub fn sign(&self, data: &[u8], algorithm: HashAlgorithm) -> CryptoResult<Vec<u8>> {
        let scheme = scheme(algorithm)?;
        let private_key = self.context.private_key()?;
        let digest = hash::digest(data, algorithm);
        let signature = private_key
            .sign_with_rng(&mut OsRng, scheme, &digest)
            .map_err(|e| CryptoError::operation(format!("Signing failed: {}", e)))?;

        log::debug!(
            "Signed {} bytes with {} ({}-byte signature)",
            data.len(),
            algorithm,
            signature.len()
        );
        Ok(signature)
    }

    /// Sign `data` and render the signature as text
    pub fn sign_encoded(
        &self,
        data: &[u8],
        algorithm: HashAlgorithm,
        encoding: ByteEncoding,
    ) -> CryptoResult<String> {
        Ok(encoding.encode(&self.sign(data, algorithm)?))
    }

    /// Sign a string after converting it with the options' text encoding
    pub fn sign_string(&self, text: &str, options: &SignOptions) -> CryptoResult<String> {
        self.sign_encoded(
            &options.text_encoding.encode(text),
            options.hash,
            options.encoding,
        )
    }

    /// Check a signature over `data`; any failure is reported as `false`
    pub fn verify(&self, data: &[u8], signature: &[u8], algorithm: HashAlgorithm) -> bool {
        let scheme = match scheme(algorithm) {
            Ok(scheme) => scheme,
            Err(e) => {
                log::warn!("Signature verification rejected: {}", e);
                return false;
            }
        };
        let digest = hash::digest(data, algorithm);
        match self.context.public_key().verify(scheme, &digest, signature) {
            Ok(()) => true,
            Err(e) => {
                log::warn!(
                    "Signature verification failed for certificate {}: {}",
                    self.context.thumbprint(),
                    e
                );
                false
            }
        }
    }

    /// Check a text-encoded signature; undecodable text is `false`
    pub fn verify_encoded(
        &self,
        data: &[u8],
        signature: &str,
        algorithm: HashAlgorithm,
        encoding: ByteEncoding,
    ) -> bool {
        match encoding.decode(signature) {
            Ok(signature) => self.verify(data, &signature, algorithm),
            Err(e) => {
                log::warn!("Cannot decode signature: {}", e);
                false
            }
        }
    }

    /// Check a signature produced by [`sign_string`](Self::sign_string)
    pub fn verify_string(&self, text: &str, signature: &str, options: &SignOptions) -> bool {
        self.verify_encoded(
            &options.text_encoding.encode(text),
            signature,
            options.hash,
            options.encoding,
        )
    }
}
