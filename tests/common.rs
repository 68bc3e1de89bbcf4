//! Shared fixtures for the integration tests
#![allow(dead_code)]

use cipherkit::{Certificate, CertificateKeyContext};
use std::sync::Arc;

pub const CERT_PEM: &str = include_str!("fixtures/test_cert.pem");
pub const KEY_PEM: &str = include_str!("fixtures/test_key.pem");
pub const ENCRYPTED_KEY_PEM: &str = include_str!("fixtures/test_key_encrypted.pem");
pub const CERT_DER: &[u8] = include_bytes!("fixtures/test_cert.der");
pub const CERT_P12: &[u8] = include_bytes!("fixtures/test_cert.p12");
pub const CERT_3072_PEM: &str = include_str!("fixtures/test_cert_3072.pem");
pub const KEY_3072_PEM: &str = include_str!("fixtures/test_key_3072.pem");

pub const P12_PASSWORD: &str = "test";
pub const THUMBPRINT: &str = "48374418F6E5312DA43ABD2D455FCF5FD626F2CD";
pub const THUMBPRINT_3072: &str = "3D9AA9C277604F752AA38912BF2CA882418E8746";

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// 2048-bit context with its private key
pub fn private_context() -> Arc<CertificateKeyContext> {
    Arc::new(CertificateKeyContext::from_bytes(CERT_P12, Some(P12_PASSWORD)).unwrap())
}

/// 2048-bit context without a private key
pub fn public_context() -> Arc<CertificateKeyContext> {
    Arc::new(CertificateKeyContext::from_bytes(CERT_PEM.as_bytes(), None).unwrap())
}

/// 3072-bit context with its private key
pub fn private_context_3072() -> Arc<CertificateKeyContext> {
    let cert = Certificate::from_pem(CERT_3072_PEM, None)
        .unwrap()
        .with_private_key_pem(KEY_3072_PEM, None)
        .unwrap();
    Arc::new(CertificateKeyContext::from_certificate(cert))
}

/// Printable ASCII text of the given length
pub fn text_of_len(len: usize) -> String {
    (0..len).map(|i| (b'a' + (i % 26) as u8) as char).collect()
}
