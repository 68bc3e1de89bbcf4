//! Error types for cryptographic operations
//!
//! Every failure in the toolkit is reported through [`CryptoError`]. Messages
//! never carry key material, plaintext or secrets.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for crypto operations
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors that can occur during encryption, decryption, signing and key resolution
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Symmetric key has the wrong length or is not valid key material
    #[error("Invalid key: {message}")]
    InvalidKey { message: String },

    /// Input is too short or not aligned to the cipher block size
    #[error("Malformed input: {message}")]
    MalformedInput { message: String },

    /// Text input is not in the expected format (separator, hex, base64, charset)
    #[error("Format error: {message}")]
    Format { message: String },

    /// The operation needs a private key that the certificate does not carry
    #[error("Private key not available: {message}")]
    PrivateKeyNotAvailable { message: String },

    /// No certificate with the given thumbprint exists in the store
    #[error("Cannot find certificate with thumbprint: {thumbprint}")]
    CertificateNotFound { thumbprint: String },

    /// A certificate or input file does not exist
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// Decryption produced invalid PKCS#7 padding (wrong key, wrong IV or tampered data)
    #[error("Padding validation failed: wrong key or corrupted ciphertext")]
    PaddingValidation,

    /// The service was disposed and its secret released
    #[error("Service has been disposed")]
    Disposed,

    /// Algorithm not supported for this operation
    #[error("Unsupported algorithm: {algorithm}")]
    UnsupportedAlgorithm { algorithm: String },

    /// Certificate or key material could not be parsed or does not fit together
    #[error("Certificate error: {details}")]
    Certificate { details: String },

    /// RSA wrap/unwrap or signing failure
    #[error("Cryptographic operation failed: {operation}")]
    CryptographicOperation { operation: String },

    /// Invalid or unreadable configuration
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Underlying I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CryptoError {
    pub(crate) fn format(message: impl Into<String>) -> Self {
        CryptoError::Format {
            message: message.into(),
        }
    }

    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        CryptoError::MalformedInput {
            message: message.into(),
        }
    }

    pub(crate) fn certificate(details: impl Into<String>) -> Self {
        CryptoError::Certificate {
            details: details.into(),
        }
    }

    pub(crate) fn operation(operation: impl Into<String>) -> Self {
        CryptoError::CryptographicOperation {
            operation: operation.into(),
        }
    }
}

impl From<rsa::Error> for CryptoError {
    fn from(err: rsa::Error) -> Self {
        CryptoError::CryptographicOperation {
            operation: format!("RSA operation failed: {}", err),
        }
    }
}

impl From<der::Error> for CryptoError {
    fn from(err: der::Error) -> Self {
        CryptoError::Certificate {
            details: format!("DER decoding failed: {}", err),
        }
    }
}

impl From<der::pem::Error> for CryptoError {
    fn from(err: der::pem::Error) -> Self {
        CryptoError::Certificate {
            details: format!("PEM decoding failed: {}", err),
        }
    }
}

impl From<toml::de::Error> for CryptoError {
    fn from(err: toml::de::Error) -> Self {
        CryptoError::Configuration {
            message: err.to_string(),
        }
    }
}
