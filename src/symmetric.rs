//! AES-256-CBC encryption with PKCS#7 padding
//!
//! Every call to [`encrypt`] draws a fresh 16-byte IV from the OS random
//! source. The scheme carries no MAC: a padding failure after decryption is the
//! only signal of a wrong key or tampered ciphertext, and a wrong key can
//! occasionally yield garbage that happens to pass the padding check.

use crate::error::{CryptoError, CryptoResult};
use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroizing;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// AES-256 key length in bytes
pub const KEY_LENGTH: usize = 32;

/// CBC initialization vector length in bytes
pub const IV_LENGTH: usize = 16;

/// AES block size in bytes
pub const BLOCK_SIZE: usize = 16;

/// Ciphertext together with the IV it was produced under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedBlock {
    ciphertext: Vec<u8>,
    iv: [u8; IV_LENGTH],
}

impl EncryptedBlock {
    /// Construct from ciphertext and IV
    pub fn new(ciphertext: Vec<u8>, iv: [u8; IV_LENGTH]) -> Self {
        Self { ciphertext, iv }
    }

    /// Construct from ciphertext and an IV slice that must be exactly 16 bytes
    pub fn from_parts(ciphertext: Vec<u8>, iv: &[u8]) -> CryptoResult<Self> {
        let iv: [u8; IV_LENGTH] = iv.try_into().map_err(|_| {
            CryptoError::malformed(format!(
                "IV must be {} bytes, got {}",
                IV_LENGTH,
                iv.len()
            ))
        })?;
        Ok(Self::new(ciphertext, iv))
    }

    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    pub fn iv(&self) -> &[u8; IV_LENGTH] {
        &self.iv
    }
}

/// Generate a random AES-256 key
pub fn generate_key() -> Zeroizing<[u8; KEY_LENGTH]> {
    let mut key = Zeroizing::new([0u8; KEY_LENGTH]);
    OsRng.fill_bytes(key.as_mut());
    key
}

fn generate_iv() -> [u8; IV_LENGTH] {
    let mut iv = [0u8; IV_LENGTH];
    OsRng.fill_bytes(&mut iv);
    iv
}

fn check_key(key: &[u8]) -> CryptoResult<()> {
    if key.len() != KEY_LENGTH {
        return Err(CryptoError::InvalidKey {
            message: format!("AES-256 requires {}-byte key, got {}", KEY_LENGTH, key.len()),
        });
    }
    Ok(())
}

/// Encrypt `plaintext` under `key` with a freshly generated IV
pub fn encrypt(plaintext: &[u8], key: &[u8]) -> CryptoResult<EncryptedBlock> {
    check_key(key)?;

    let iv = generate_iv();
    let cipher = Aes256CbcEnc::new_from_slices(key, &iv).map_err(|_| CryptoError::InvalidKey {
        message: "AES-256-CBC key setup failed".to_string(),
    })?;
    let ciphertext = cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext);

    log::debug!(
        "AES-256-CBC encrypted {} bytes into {} bytes",
        plaintext.len(),
        ciphertext.len()
    );
    Ok(EncryptedBlock::new(ciphertext, iv))
}

/// Decrypt a block produced by [`encrypt`]
pub fn decrypt(block: &EncryptedBlock, key: &[u8]) -> CryptoResult<Vec<u8>> {
    check_key(key)?;

    let ciphertext = block.ciphertext();
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_SIZE != 0 {
        return Err(CryptoError::malformed(format!(
            "Ciphertext length {} is not a positive multiple of {}",
            ciphertext.len(),
            BLOCK_SIZE
        )));
    }

    let cipher =
        Aes256CbcDec::new_from_slices(key, block.iv()).map_err(|_| CryptoError::InvalidKey {
            message: "AES-256-CBC key setup failed".to_string(),
        })?;
    cipher
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| CryptoError::PaddingValidation)
}
