//! Key resolution for certificate-based services

use super::store::{CertificateStore, StoreLocation, StoreName};
use super::Certificate;
use crate::config::CryptoConfig;
use crate::error::{CryptoError, CryptoResult};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use std::fs;
use std::path::Path;

/// Public key (always) and private key (when available) of one certificate
///
/// Built once and shared through `Arc` by the hybrid encryption and signing
/// services. Immutable after construction.
#[derive(Debug, Clone)]
pub struct CertificateKeyContext {
    certificate: Certificate,
}

impl CertificateKeyContext {
    /// Use an already loaded certificate
    pub fn from_certificate(certificate: Certificate) -> Self {
        log::info!(
            "Using certificate {} ({}), private key {}",
            certificate.subject(),
            certificate.thumbprint(),
            if certificate.has_private_key() { "present" } else { "absent" }
        );
        Self { certificate }
    }

    /// Load a certificate file (PEM, DER or PKCS#12)
    pub fn from_file<P: AsRef<Path>>(path: P, password: Option<&str>) -> CryptoResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CryptoError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let bytes = fs::read(path)?;
        Self::from_bytes(&bytes, password)
    }

    /// Parse certificate bytes (PEM, DER or PKCS#12)
    pub fn from_bytes(bytes: &[u8], password: Option<&str>) -> CryptoResult<Self> {
        Ok(Self::from_certificate(Certificate::from_bytes(bytes, password)?))
    }

    /// Look up a certificate by thumbprint in a named store
    pub fn from_store(
        thumbprint: &str,
        name: StoreName,
        location: StoreLocation,
        config: &CryptoConfig,
    ) -> CryptoResult<Self> {
        let store = CertificateStore::open(name, location, config)?;
        Self::from_store_at(&store, thumbprint)
    }

    /// Look up a certificate by thumbprint in an opened store
    pub fn from_store_at(store: &CertificateStore, thumbprint: &str) -> CryptoResult<Self> {
        Ok(Self::from_certificate(store.find_by_thumbprint(thumbprint)?))
    }

    pub fn certificate(&self) -> &Certificate {
        &self.certificate
    }

    pub fn public_key(&self) -> &RsaPublicKey {
        self.certificate.public_key()
    }

    /// Private key, or [`CryptoError::PrivateKeyNotAvailable`] for public-only certificates
    pub fn private_key(&self) -> CryptoResult<&RsaPrivateKey> {
        self.certificate
            .private_key()
            .ok_or_else(|| CryptoError::PrivateKeyNotAvailable {
                message: format!(
                    "Certificate {} has no private key",
                    self.certificate.thumbprint()
                ),
            })
    }

    pub fn has_private_key(&self) -> bool {
        self.certificate.has_private_key()
    }

    /// RSA modulus size in bytes
    pub fn modulus_size(&self) -> usize {
        self.public_key().size()
    }

    pub fn thumbprint(&self) -> &str {
        self.certificate.thumbprint()
    }

    pub fn subject(&self) -> &str {
        self.certificate.subject()
    }
}
