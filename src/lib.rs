//! Shared-secret and certificate-based encryption, signing and verification
//!
//! - [`SharedSecretEncryptionService`]: AES-256-CBC under a caller-supplied 256-bit secret
//! - [`HybridCertificateEncryptionService`]: RSA-OAEP key wrapping plus AES-256-CBC
//!   under an X.509 certificate
//! - [`CertificateSignService`]: PKCS#1 v1.5 signatures with the certificate's key
//!
//! Certificate services share one [`CertificateKeyContext`] through `Arc`:
//!
//! ```no_run
//! use cipherkit::{CertificateKeyContext, CertificateSignService, Encryption,
//!                 HybridCertificateEncryptionService, ByteEncoding, SignOptions};
//! use std::sync::Arc;
//!
//! # fn main() -> cipherkit::CryptoResult<()> {
//! let context = Arc::new(CertificateKeyContext::from_file("cert.p12", Some("password"))?);
//! let encryption = HybridCertificateEncryptionService::new(Arc::clone(&context));
//! let signing = CertificateSignService::new(context);
//!
//! let token = encryption.encrypt_string("hello", ByteEncoding::Base64)?;
//! let signature = signing.sign_string(&token, &SignOptions::default())?;
//! assert!(signing.verify_string(&token, &signature, &SignOptions::default()));
//! # Ok(())
//! # }
//! ```

pub mod certificate;
pub mod config;
pub mod encoding;
pub mod error;
pub mod files;
pub mod framing;
pub mod hash;
pub mod hybrid;
pub mod secret;
pub mod service;
pub mod shared_secret;
pub mod signing;
pub mod symmetric;

pub use certificate::{
    Certificate, CertificateKeyContext, CertificateStore, StoreLocation, StoreName,
};
pub use config::{CryptoConfig, StoreConfig};
pub use encoding::{ByteEncoding, TextEncoding};
pub use error::{CryptoError, CryptoResult};
pub use hash::HashAlgorithm;
pub use hybrid::HybridCertificateEncryptionService;
pub use secret::Secret;
pub use service::Encryption;
pub use shared_secret::SharedSecretEncryptionService;
pub use signing::{CertificateSignService, SignOptions};
pub use symmetric::EncryptedBlock;
