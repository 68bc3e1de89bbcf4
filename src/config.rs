//! Toolkit configuration
//!
//! [`CryptoConfig`] can be built in code with the `with_*` methods or loaded
//! from a TOML file:
//!
//! ```toml
//! default_encoding = "upper-hex"
//! default_hash = "sha384"
//! large_file_warning_bytes = 1048576
//!
//! [store]
//! current_user_root = "/home/me/.certs"
//! ```

use crate::encoding::ByteEncoding;
use crate::error::{CryptoError, CryptoResult};
use crate::hash::HashAlgorithm;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Files above this size are still processed but logged with a warning
pub const DEFAULT_LARGE_FILE_WARNING_BYTES: u64 = 64 * 1024 * 1024;

/// Directory overrides for the certificate store locations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Root directory for `StoreLocation::CurrentUser`
    pub current_user_root: Option<PathBuf>,
    /// Root directory for `StoreLocation::LocalMachine`
    pub local_machine_root: Option<PathBuf>,
}

/// Toolkit-wide defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CryptoConfig {
    /// Encoding used by the convenience string APIs when none is given
    pub default_encoding: ByteEncoding,
    /// Digest used by signing when none is given
    pub default_hash: HashAlgorithm,
    /// Size threshold for the large-file warning
    pub large_file_warning_bytes: u64,
    /// Certificate store directories
    pub store: StoreConfig,
}

impl Default for CryptoConfig {
    fn default() -> Self {
        Self {
            default_encoding: ByteEncoding::Base64,
            default_hash: HashAlgorithm::Sha256,
            large_file_warning_bytes: DEFAULT_LARGE_FILE_WARNING_BYTES,
            store: StoreConfig::default(),
        }
    }
}

impl CryptoConfig {
    /// Create a config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and validate a TOML config file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> CryptoResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CryptoError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        log::info!("Loaded crypto configuration from {}", path.display());
        Ok(config)
    }

    /// Parse and validate TOML text
    pub fn from_toml_str(content: &str) -> CryptoResult<Self> {
        let config: CryptoConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CryptoResult<()> {
        if !self.default_hash.is_signing_algorithm() {
            return Err(CryptoError::Configuration {
                message: format!("{} cannot be the default signing hash", self.default_hash),
            });
        }
        if self.large_file_warning_bytes == 0 {
            return Err(CryptoError::Configuration {
                message: "large_file_warning_bytes must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Set the default byte encoding
    pub fn with_encoding(mut self, encoding: ByteEncoding) -> Self {
        self.default_encoding = encoding;
        self
    }

    /// Set the default signing hash
    pub fn with_hash(mut self, hash: HashAlgorithm) -> Self {
        self.default_hash = hash;
        self
    }

    /// Set the large-file warning threshold
    pub fn with_large_file_warning(mut self, bytes: u64) -> Self {
        self.large_file_warning_bytes = bytes;
        self
    }

    /// Override the CurrentUser store root
    pub fn with_current_user_store<P: Into<PathBuf>>(mut self, root: P) -> Self {
        self.store.current_user_root = Some(root.into());
        self
    }

    /// Override the LocalMachine store root
    pub fn with_local_machine_store<P: Into<PathBuf>>(mut self, root: P) -> Self {
        self.store.local_machine_root = Some(root.into());
        self
    }
}
