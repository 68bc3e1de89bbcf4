//! X.509 certificates carrying an RSA key pair
//!
//! A [`Certificate`] always has an RSA public key and may carry the matching
//! private key. Certificates load from DER, PEM (optionally bundled with a
//! private key block) and PKCS#12 archives.

pub mod context;
pub mod store;

pub use context::CertificateKeyContext;
pub use store::{CertificateStore, StoreLocation, StoreName};

use crate::encoding::ByteEncoding;
use crate::error::{CryptoError, CryptoResult};
use crate::hash::{self, HashAlgorithm};
use der::{Decode, Encode};
use p12_keystore::{KeyStore, KeyStoreEntry};
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::{RsaPrivateKey, RsaPublicKey};
use std::fmt;

const PEM_BEGIN: &str = "-----BEGIN ";
const PEM_END: &str = "-----END ";

/// Parsed certificate with its RSA keys
#[derive(Clone)]
pub struct Certificate {
    der: Vec<u8>,
    subject: String,
    thumbprint: String,
    public_key: RsaPublicKey,
    private_key: Option<RsaPrivateKey>,
}

impl Certificate {
    /// Parse a DER-encoded X.509 certificate
    pub fn from_der(der: &[u8]) -> CryptoResult<Self> {
        let cert = x509_cert::Certificate::from_der(der)?;
        let spki = cert.tbs_certificate.subject_public_key_info.to_der()?;
        let public_key = RsaPublicKey::from_public_key_der(&spki).map_err(|e| {
            CryptoError::certificate(format!("Certificate does not carry an RSA public key: {}", e))
        })?;

        Ok(Self {
            der: der.to_vec(),
            subject: cert.tbs_certificate.subject.to_string(),
            thumbprint: hash::digest_encoded(der, HashAlgorithm::Sha1, ByteEncoding::UpperHex),
            public_key,
            private_key: None,
        })
    }

    /// Parse PEM text holding a `CERTIFICATE` block and optionally a private key block
    ///
    /// Recognized key labels are `PRIVATE KEY`, `RSA PRIVATE KEY` and
    /// `ENCRYPTED PRIVATE KEY`; the last one needs `password`.
    pub fn from_pem(pem: &str, password: Option<&str>) -> CryptoResult<Self> {
        let mut certificate: Option<Certificate> = None;
        let mut private_key: Option<RsaPrivateKey> = None;

        for block in pem_blocks(pem) {
            let (label, der) = der::pem::decode_vec(block.as_bytes())?;
            match label {
                "CERTIFICATE" if certificate.is_none() => {
                    certificate = Some(Self::from_der(&der)?);
                }
                "CERTIFICATE" => {}
                "PRIVATE KEY" | "RSA PRIVATE KEY" | "ENCRYPTED PRIVATE KEY" => {
                    private_key = Some(decode_private_key(label, &der, password)?);
                }
                other => log::debug!("Skipping PEM block labelled {}", other),
            }
        }

        let certificate = certificate
            .ok_or_else(|| CryptoError::certificate("No CERTIFICATE block found in PEM input"))?;
        match private_key {
            Some(key) => certificate.with_private_key(key),
            None => Ok(certificate),
        }
    }

    /// Parse only the first `CERTIFICATE` block of PEM text, ignoring any key blocks
    pub fn from_pem_public(pem: &str) -> CryptoResult<Self> {
        for block in pem_blocks(pem) {
            let (label, der) = der::pem::decode_vec(block.as_bytes())?;
            if label == "CERTIFICATE" {
                return Self::from_der(&der);
            }
        }
        Err(CryptoError::certificate("No CERTIFICATE block found in PEM input"))
    }

    /// Parse a PKCS#12 archive, taking the first key chain or else the first certificate
    pub fn from_pkcs12(data: &[u8], password: &str) -> CryptoResult<Self> {
        let keystore = KeyStore::from_pkcs12(data, password)
            .map_err(|e| CryptoError::certificate(format!("Cannot read PKCS#12 archive: {}", e)))?;

        if let Some((alias, chain)) = keystore.private_key_chain() {
            let leaf = chain.chain().first().ok_or_else(|| {
                CryptoError::certificate(format!("PKCS#12 entry '{}' has no certificate", alias))
            })?;
            let key = RsaPrivateKey::from_pkcs8_der(chain.key()).map_err(|e| {
                CryptoError::certificate(format!("PKCS#12 private key is not RSA: {}", e))
            })?;
            return Self::from_der(leaf.as_der())?.with_private_key(key);
        }

        keystore
            .entries()
            .find_map(|(_, entry)| match entry {
                KeyStoreEntry::Certificate(cert) => Some(cert),
                KeyStoreEntry::PrivateKeyChain(_) => None,
            })
            .ok_or_else(|| CryptoError::certificate("PKCS#12 archive contains no certificate"))
            .and_then(|cert| Self::from_der(cert.as_der()))
    }

    /// Parse certificate material of unknown format
    ///
    /// PEM text is detected by its armor; binary input is tried as a bare DER
    /// certificate first and then as PKCS#12 (an absent password is empty).
    pub fn from_bytes(data: &[u8], password: Option<&str>) -> CryptoResult<Self> {
        if let Some(text) = pem_text(data) {
            return Self::from_pem(text, password);
        }
        match Self::from_der(data) {
            Ok(cert) => Ok(cert),
            Err(der_err) => Self::from_pkcs12(data, password.unwrap_or("")).map_err(|p12_err| {
                CryptoError::certificate(format!(
                    "Input is neither a DER certificate ({}) nor a PKCS#12 archive ({})",
                    der_err, p12_err
                ))
            }),
        }
    }

    /// Attach a private key, which must match the certificate's public key
    pub fn with_private_key(mut self, private_key: RsaPrivateKey) -> CryptoResult<Self> {
        if private_key.to_public_key() != self.public_key {
            return Err(CryptoError::certificate(
                "Private key does not match the certificate's public key",
            ));
        }
        self.private_key = Some(private_key);
        Ok(self)
    }

    /// Attach a private key given as a PEM block
    pub fn with_private_key_pem(self, pem: &str, password: Option<&str>) -> CryptoResult<Self> {
        let (label, der) = der::pem::decode_vec(pem.trim().as_bytes())?;
        let key = decode_private_key(label, &der, password)?;
        self.with_private_key(key)
    }

    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public_key
    }

    pub fn private_key(&self) -> Option<&RsaPrivateKey> {
        self.private_key.as_ref()
    }

    pub fn has_private_key(&self) -> bool {
        self.private_key.is_some()
    }

    /// Upper-case hex SHA-1 digest of the DER encoding
    pub fn thumbprint(&self) -> &str {
        &self.thumbprint
    }

    /// Subject distinguished name in RFC 4514 form
    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn to_der(&self) -> &[u8] {
        &self.der
    }

    /// Whether `thumbprint` names this certificate, ignoring case, colons and whitespace
    pub fn matches_thumbprint(&self, thumbprint: &str) -> bool {
        normalize_thumbprint(thumbprint) == self.thumbprint
    }
}

impl fmt::Debug for Certificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Certificate")
            .field("subject", &self.subject)
            .field("thumbprint", &self.thumbprint)
            .field("private_key", &self.private_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Canonical thumbprint form: upper-case hex without separators
pub fn normalize_thumbprint(thumbprint: &str) -> String {
    thumbprint
        .chars()
        .filter(|c| *c != ':' && !c.is_whitespace() && c.is_ascii())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

fn decode_private_key(
    label: &str,
    der: &[u8],
    password: Option<&str>,
) -> CryptoResult<RsaPrivateKey> {
    let key = match label {
        "RSA PRIVATE KEY" => RsaPrivateKey::from_pkcs1_der(der)
            .map_err(|e| CryptoError::certificate(format!("Invalid PKCS#1 private key: {}", e)))?,
        "ENCRYPTED PRIVATE KEY" => {
            let password = password.ok_or_else(|| {
                CryptoError::certificate("Encrypted private key requires a password")
            })?;
            RsaPrivateKey::from_pkcs8_encrypted_der(der, password).map_err(|e| {
                CryptoError::certificate(format!("Cannot decrypt private key: {}", e))
            })?
        }
        _ => RsaPrivateKey::from_pkcs8_der(der)
            .map_err(|e| CryptoError::certificate(format!("Invalid PKCS#8 private key: {}", e)))?,
    };
    Ok(key)
}

/// `data` as text when it starts with PEM armor
pub(crate) fn pem_text(data: &[u8]) -> Option<&str> {
    std::str::from_utf8(data)
        .ok()
        .filter(|text| text.trim_start().starts_with(PEM_BEGIN))
}

/// Split PEM text into its armored blocks
fn pem_blocks(text: &str) -> Vec<&str> {
    let mut blocks = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find(PEM_BEGIN) {
        let from_begin = &rest[start..];
        let label_end = match from_begin[PEM_BEGIN.len()..].find("-----") {
            Some(pos) => PEM_BEGIN.len() + pos,
            None => break,
        };
        let label = &from_begin[PEM_BEGIN.len()..label_end];
        let end_marker = format!("{}{}-----", PEM_END, label);
        match from_begin.find(&end_marker) {
            Some(end) => {
                let block_end = end + end_marker.len();
                blocks.push(&from_begin[..block_end]);
                rest = &from_begin[block_end..];
            }
            None => break,
        }
    }
    blocks
}
