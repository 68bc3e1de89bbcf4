//! Directory-backed certificate stores
//!
//! A store is a directory of certificate files. Each [`StoreName`] maps to a
//! subdirectory under a per-[`StoreLocation`] root:
//!
//! - `CurrentUser`: `<data_local_dir>/cipherkit/stores/<name>`
//! - `LocalMachine`: `/etc/cipherkit/stores/<name>` (`%ProgramData%\cipherkit\stores\<name>` on Windows)
//!
//! Both roots can be overridden through [`StoreConfig`](crate::config::StoreConfig).
//!
//! PKCS#12 archives and encrypted PEM keys are opened with the store's
//! password. A PEM file whose key cannot be decrypted still contributes its
//! certificate, without the private key.

use super::{normalize_thumbprint, pem_text, Certificate};
use crate::config::CryptoConfig;
use crate::error::{CryptoError, CryptoResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use zeroize::Zeroizing;

const CERTIFICATE_EXTENSIONS: [&str; 6] = ["pem", "crt", "cer", "der", "p12", "pfx"];

/// Logical certificate store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StoreName {
    /// Personal certificates, usually with private keys
    #[default]
    My,
    /// Trusted root authorities
    Root,
    /// Intermediate authorities
    CertificateAuthority,
    TrustedPeople,
    AddressBook,
}

impl StoreName {
    /// Directory name of the store under its location root
    pub fn dir_name(self) -> &'static str {
        match self {
            StoreName::My => "my",
            StoreName::Root => "root",
            StoreName::CertificateAuthority => "ca",
            StoreName::TrustedPeople => "trusted-people",
            StoreName::AddressBook => "address-book",
        }
    }
}

impl fmt::Display for StoreName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Owner scope of a certificate store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StoreLocation {
    #[default]
    CurrentUser,
    LocalMachine,
}

impl StoreLocation {
    /// Root directory holding all stores of this location
    pub fn root(self, config: &CryptoConfig) -> CryptoResult<PathBuf> {
        match self {
            StoreLocation::CurrentUser => match &config.store.current_user_root {
                Some(root) => Ok(root.clone()),
                None => dirs::data_local_dir()
                    .map(|dir| dir.join("cipherkit").join("stores"))
                    .ok_or_else(|| CryptoError::Configuration {
                        message: "Cannot determine the user data directory".to_string(),
                    }),
            },
            StoreLocation::LocalMachine => match &config.store.local_machine_root {
                Some(root) => Ok(root.clone()),
                None => Ok(system_store_root()),
            },
        }
    }
}

#[cfg(windows)]
fn system_store_root() -> PathBuf {
    std::env::var_os("ProgramData")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(r"C:\ProgramData"))
        .join("cipherkit")
        .join("stores")
}

#[cfg(not(windows))]
fn system_store_root() -> PathBuf {
    PathBuf::from("/etc/cipherkit/stores")
}

/// Certificates loaded from one store directory
#[derive(Clone)]
pub struct CertificateStore {
    path: PathBuf,
    password: Option<Zeroizing<String>>,
}

impl CertificateStore {
    /// Open a named store at a location
    pub fn open(name: StoreName, location: StoreLocation, config: &CryptoConfig) -> CryptoResult<Self> {
        let path = location.root(config)?.join(name.dir_name());
        log::debug!("Opening {:?} store {} at {}", location, name, path.display());
        Ok(Self::at(path))
    }

    /// Open the store held in `path`
    pub fn at<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            password: None,
        }
    }

    /// Password for PKCS#12 archives and encrypted private keys in the store
    pub fn with_password(mut self, password: &str) -> Self {
        self.password = Some(Zeroizing::new(password.to_string()));
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every certificate file in the store
    ///
    /// A missing directory is an empty store. Files that fail to parse are
    /// skipped with a warning, as are PKCS#12 archives the store password
    /// does not open.
    pub fn certificates(&self) -> CryptoResult<Vec<Certificate>> {
        if !self.path.is_dir() {
            return Ok(Vec::new());
        }

        let mut paths: Vec<PathBuf> = fs::read_dir(&self.path)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && has_certificate_extension(path))
            .collect();
        paths.sort();

        let mut certificates = Vec::with_capacity(paths.len());
        for path in paths {
            match self.load(&path) {
                Ok(cert) => certificates.push(cert),
                Err(CryptoError::Io(e)) => return Err(CryptoError::Io(e)),
                Err(e) => log::warn!("Skipping unreadable certificate {}: {}", path.display(), e),
            }
        }
        Ok(certificates)
    }

    fn load(&self, path: &Path) -> CryptoResult<Certificate> {
        let bytes = fs::read(path)?;
        let password = self.password.as_deref().map(String::as_str);
        match Certificate::from_bytes(&bytes, password) {
            Ok(cert) => Ok(cert),
            Err(err) => match pem_text(&bytes).map(Certificate::from_pem_public) {
                Some(Ok(cert)) => {
                    log::warn!(
                        "Loaded {} without its private key: {}",
                        path.display(),
                        err
                    );
                    Ok(cert)
                }
                _ => Err(err),
            },
        }
    }

    /// Find a certificate by thumbprint, ignoring case, colons and whitespace
    ///
    /// When several files hold the certificate, one carrying the private key wins.
    pub fn find_by_thumbprint(&self, thumbprint: &str) -> CryptoResult<Certificate> {
        let wanted = normalize_thumbprint(thumbprint);
        let mut matches: Vec<Certificate> = self
            .certificates()?
            .into_iter()
            .filter(|cert| cert.thumbprint() == wanted)
            .collect();
        match matches.iter().position(Certificate::has_private_key) {
            Some(index) => Ok(matches.swap_remove(index)),
            None if !matches.is_empty() => Ok(matches.swap_remove(0)),
            None => Err(CryptoError::CertificateNotFound {
                thumbprint: thumbprint.to_string(),
            }),
        }
    }
}

impl fmt::Debug for CertificateStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CertificateStore")
            .field("path", &self.path)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

fn has_certificate_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            CERTIFICATE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const CERT_PEM: &str = include_str!("../../tests/fixtures/test_cert.pem");
    const CERT_DER: &[u8] = include_bytes!("../../tests/fixtures/test_cert.der");
    const CERT_3072_PEM: &str = include_str!("../../tests/fixtures/test_cert_3072.pem");
    const CERT_P12: &[u8] = include_bytes!("../../tests/fixtures/test_cert.p12");
    const ENCRYPTED_KEY_PEM: &str = include_str!("../../tests/fixtures/test_key_encrypted.pem");
    const THUMBPRINT: &str = "48374418F6E5312DA43ABD2D455FCF5FD626F2CD";

    #[test]
    fn test_missing_directory_is_empty_store() {
        let dir = tempdir().unwrap();
        let store = CertificateStore::at(dir.path().join("absent"));
        assert!(store.certificates().unwrap().is_empty());
        assert!(matches!(
            store.find_by_thumbprint("00"),
            Err(CryptoError::CertificateNotFound { .. })
        ));
    }

    #[test]
    fn test_loads_known_extensions_only() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.pem"), CERT_PEM).unwrap();
        fs::write(dir.path().join("b.CER"), CERT_DER).unwrap();
        fs::write(dir.path().join("c.crt"), CERT_3072_PEM).unwrap();
        fs::write(dir.path().join("notes.txt"), CERT_PEM).unwrap();
        fs::write(dir.path().join("broken.der"), b"not a certificate").unwrap();

        let certs = CertificateStore::at(dir.path()).certificates().unwrap();
        assert_eq!(certs.len(), 3);
    }

    #[test]
    fn test_open_uses_config_override() {
        let dir = tempdir().unwrap();
        let config = CryptoConfig::new()
            .with_current_user_store(dir.path().join("user"))
            .with_local_machine_store(dir.path().join("machine"));

        let user = CertificateStore::open(StoreName::My, StoreLocation::CurrentUser, &config).unwrap();
        assert_eq!(user.path(), dir.path().join("user").join("my"));

        let machine =
            CertificateStore::open(StoreName::Root, StoreLocation::LocalMachine, &config).unwrap();
        assert_eq!(machine.path(), dir.path().join("machine").join("root"));
    }

    #[test]
    fn test_find_by_thumbprint_ignores_case() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("cert.pem"), CERT_PEM).unwrap();
        let store = CertificateStore::at(dir.path());

        let cert = store
            .find_by_thumbprint("48374418f6e5312da43abd2d455fcf5fd626f2cd")
            .unwrap();
        assert_eq!(cert.thumbprint(), "48374418F6E5312DA43ABD2D455FCF5FD626F2CD");
    }

    #[test]
    fn test_pkcs12_archives_open_with_store_password() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("service.pfx"), CERT_P12).unwrap();
        fs::write(dir.path().join("backup.P12"), CERT_P12).unwrap();

        let locked = CertificateStore::at(dir.path());
        assert!(locked.certificates().unwrap().is_empty());

        let store = CertificateStore::at(dir.path()).with_password("test");
        assert_eq!(store.certificates().unwrap().len(), 2);
        let cert = store.find_by_thumbprint(THUMBPRINT).unwrap();
        assert!(cert.has_private_key());
    }

    #[test]
    fn test_encrypted_key_bundle() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("service.pem"),
            format!("{}\n{}", CERT_PEM, ENCRYPTED_KEY_PEM),
        )
        .unwrap();

        let without_password = CertificateStore::at(dir.path())
            .find_by_thumbprint(THUMBPRINT)
            .unwrap();
        assert!(!without_password.has_private_key());

        let with_password = CertificateStore::at(dir.path())
            .with_password("test")
            .find_by_thumbprint(THUMBPRINT)
            .unwrap();
        assert!(with_password.has_private_key());
    }

    #[test]
    fn test_private_key_copy_is_preferred() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.pem"), CERT_PEM).unwrap();
        fs::write(dir.path().join("b.pfx"), CERT_P12).unwrap();

        let store = CertificateStore::at(dir.path()).with_password("test");
        assert_eq!(store.certificates().unwrap().len(), 2);
        assert!(store.find_by_thumbprint(THUMBPRINT).unwrap().has_private_key());
    }

    #[test]
    fn test_debug_redacts_password() {
        let store = CertificateStore::at("/tmp/store").with_password("hunter2");
        let debug = format!("{:?}", store);
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("hunter2"));
    }
}
