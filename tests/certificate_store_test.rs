//! Integration tests for certificate loading and key resolution

mod common;

use cipherkit::{
    CertificateKeyContext, CertificateSignService, CertificateStore, CryptoConfig, CryptoError,
    Encryption, HashAlgorithm, HybridCertificateEncryptionService, StoreLocation, StoreName,
};
use std::fs;
use std::sync::Arc;
use tempfile::tempdir;

fn populated_store_config() -> (tempfile::TempDir, CryptoConfig) {
    let dir = tempdir().unwrap();
    let my = dir.path().join("my");
    fs::create_dir_all(&my).unwrap();
    fs::write(my.join("service.pem"), format!("{}\n{}", common::CERT_PEM, common::KEY_PEM)).unwrap();
    fs::write(my.join("large.der"), {
        let cert = cipherkit::Certificate::from_pem(common::CERT_3072_PEM, None).unwrap();
        cert.to_der().to_vec()
    })
    .unwrap();

    let config = CryptoConfig::new().with_current_user_store(dir.path());
    (dir, config)
}

#[test]
fn test_thumbprint_lookup_is_case_insensitive() {
    common::init_logging();
    let (_dir, config) = populated_store_config();

    for thumbprint in [
        common::THUMBPRINT.to_string(),
        common::THUMBPRINT.to_lowercase(),
        "48:37:44:18:f6:e5:31:2d:a4:3a:bd:2d:45:5f:cf:5f:d6:26:f2:cd".to_string(),
    ] {
        let context = CertificateKeyContext::from_store(
            &thumbprint,
            StoreName::My,
            StoreLocation::CurrentUser,
            &config,
        )
        .unwrap();
        assert_eq!(context.thumbprint(), common::THUMBPRINT);
        assert!(context.has_private_key());
    }

    let large = CertificateKeyContext::from_store(
        common::THUMBPRINT_3072,
        StoreName::My,
        StoreLocation::CurrentUser,
        &config,
    )
    .unwrap();
    assert!(!large.has_private_key());
    assert_eq!(large.modulus_size(), 384);
}

#[test]
fn test_unknown_thumbprint() {
    let (_dir, config) = populated_store_config();
    let store = CertificateStore::open(StoreName::My, StoreLocation::CurrentUser, &config).unwrap();
    assert_eq!(store.certificates().unwrap().len(), 2);

    match CertificateKeyContext::from_store_at(&store, "0000000000000000000000000000000000000000") {
        Err(CryptoError::CertificateNotFound { thumbprint }) => {
            assert_eq!(thumbprint, "0000000000000000000000000000000000000000")
        }
        other => panic!("expected CertificateNotFound, got {:?}", other),
    }
}

#[test]
fn test_missing_certificate_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing.pfx");
    match CertificateKeyContext::from_file(&path, Some("test")) {
        Err(CryptoError::FileNotFound { path: reported }) => assert_eq!(reported, path),
        other => panic!("expected FileNotFound, got {:?}", other),
    }
}

#[test]
fn test_context_sources_agree() {
    let dir = tempdir().unwrap();
    let p12_path = dir.path().join("cert.p12");
    fs::write(&p12_path, common::CERT_P12).unwrap();

    let from_file = CertificateKeyContext::from_file(&p12_path, Some(common::P12_PASSWORD)).unwrap();
    let from_der = CertificateKeyContext::from_bytes(common::CERT_DER, None).unwrap();
    let from_pem = CertificateKeyContext::from_certificate(
        cipherkit::Certificate::from_pem(common::CERT_PEM, None)
            .unwrap()
            .with_private_key_pem(common::ENCRYPTED_KEY_PEM, Some(common::P12_PASSWORD))
            .unwrap(),
    );

    assert_eq!(from_file.public_key(), from_der.public_key());
    assert_eq!(from_file.public_key(), from_pem.public_key());
    assert!(from_file.has_private_key());
    assert!(!from_der.has_private_key());
    assert!(from_pem.has_private_key());
    assert_eq!(from_file.subject(), from_der.subject());
}

#[test]
fn test_store_root_from_toml_config() {
    let (dir, _) = populated_store_config();
    let toml = format!(
        "[store]\ncurrent_user_root = \"{}\"\n",
        dir.path().display().to_string().replace('\\', "\\\\")
    );
    let config = CryptoConfig::from_toml_str(&toml).unwrap();

    let context = CertificateKeyContext::from_store(
        common::THUMBPRINT,
        StoreName::My,
        StoreLocation::CurrentUser,
        &config,
    )
    .unwrap();
    assert!(context.subject().contains("CN=cipherkit test"));
}

#[test]
fn test_wrong_pkcs12_password() {
    assert!(matches!(
        CertificateKeyContext::from_bytes(common::CERT_P12, Some("wrong")),
        Err(CryptoError::Certificate { .. })
    ));
}

#[test]
fn test_protected_store_entries_keep_private_keys() {
    common::init_logging();
    let dir = tempdir().unwrap();
    let my = dir.path().join("my");
    fs::create_dir_all(&my).unwrap();
    fs::write(my.join("service.pfx"), common::CERT_P12).unwrap();
    fs::write(
        my.join("bundle.pem"),
        format!("{}\n{}", common::CERT_3072_PEM, common::KEY_3072_PEM),
    )
    .unwrap();
    let config = CryptoConfig::new().with_current_user_store(dir.path());

    // Without the password the archive cannot be opened at all
    assert!(matches!(
        CertificateKeyContext::from_store(
            common::THUMBPRINT,
            StoreName::My,
            StoreLocation::CurrentUser,
            &config,
        ),
        Err(CryptoError::CertificateNotFound { .. })
    ));

    let store = CertificateStore::open(StoreName::My, StoreLocation::CurrentUser, &config)
        .unwrap()
        .with_password(common::P12_PASSWORD);
    let context = Arc::new(CertificateKeyContext::from_store_at(&store, common::THUMBPRINT).unwrap());
    assert!(context.has_private_key());

    let hybrid = HybridCertificateEncryptionService::new(Arc::clone(&context));
    let payload = hybrid.encrypt_bytes(b"from the personal store").unwrap();
    assert_eq!(hybrid.decrypt_bytes(&payload).unwrap(), b"from the personal store");

    let signer = CertificateSignService::new(context);
    let signature = signer.sign(b"from the personal store", HashAlgorithm::Sha256).unwrap();
    assert!(signer.verify(b"from the personal store", &signature, HashAlgorithm::Sha256));
}

#[test]
fn test_encrypted_key_bundle_falls_back_to_public_certificate() {
    common::init_logging();
    let dir = tempdir().unwrap();
    let my = dir.path().join("my");
    fs::create_dir_all(&my).unwrap();
    fs::write(
        my.join("service.pem"),
        format!("{}\n{}", common::CERT_PEM, common::ENCRYPTED_KEY_PEM),
    )
    .unwrap();
    let config = CryptoConfig::new().with_current_user_store(dir.path());

    let context = CertificateKeyContext::from_store(
        common::THUMBPRINT,
        StoreName::My,
        StoreLocation::CurrentUser,
        &config,
    )
    .unwrap();
    assert!(!context.has_private_key());
    assert!(matches!(
        context.private_key(),
        Err(CryptoError::PrivateKeyNotAvailable { .. })
    ));

    let store = CertificateStore::open(StoreName::My, StoreLocation::CurrentUser, &config)
        .unwrap()
        .with_password(common::P12_PASSWORD);
    let context = CertificateKeyContext::from_store_at(&store, common::THUMBPRINT).unwrap();
    assert!(context.private_key().is_ok());
}
