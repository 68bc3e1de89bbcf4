//! Wire framing for encrypted payloads
//!
//! Binary frames:
//!
//! - shared secret: `IV(16) || ciphertext`
//! - certificate hybrid: `IV(16) || wrapped key(K) || ciphertext`, where K is
//!   the RSA modulus size in bytes
//!
//! String frames:
//!
//! - shared secret: `encode(ciphertext) '|' encode(IV)`
//! - legacy certificate hybrid (read only): `encode(IV) '|' encode(wrapped key) '|' encode(ciphertext)`

use crate::encoding::ByteEncoding;
use crate::error::{CryptoError, CryptoResult};
use crate::symmetric::{EncryptedBlock, IV_LENGTH};

/// Field separator used by the string framings
pub const SEPARATOR: char = '|';

/// Concatenate byte slices in order
pub fn concat(parts: &[&[u8]]) -> Vec<u8> {
    let total = parts.iter().map(|p| p.len()).sum();
    let mut out = Vec::with_capacity(total);
    for part in parts {
        out.extend_from_slice(part);
    }
    out
}

/// Build `IV || ciphertext`
pub fn frame_secret(block: &EncryptedBlock) -> Vec<u8> {
    concat(&[&block.iv()[..], block.ciphertext()])
}

/// Split `IV || ciphertext`
pub fn split_secret(bytes: &[u8]) -> CryptoResult<EncryptedBlock> {
    if bytes.len() < IV_LENGTH {
        return Err(CryptoError::malformed(format!(
            "Encrypted payload must be at least {} bytes, got {}",
            IV_LENGTH,
            bytes.len()
        )));
    }
    let (iv, ciphertext) = bytes.split_at(IV_LENGTH);
    EncryptedBlock::from_parts(ciphertext.to_vec(), iv)
}

/// Borrowed view over a hybrid frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HybridFrame<'a> {
    pub iv: &'a [u8],
    pub wrapped_key: &'a [u8],
    pub ciphertext: &'a [u8],
}

impl HybridFrame<'_> {
    /// Copy the IV and ciphertext out into an [`EncryptedBlock`]
    pub fn to_block(&self) -> CryptoResult<EncryptedBlock> {
        EncryptedBlock::from_parts(self.ciphertext.to_vec(), self.iv)
    }
}

/// Build `IV || wrapped key || ciphertext`
pub fn frame_hybrid(iv: &[u8], wrapped_key: &[u8], ciphertext: &[u8]) -> Vec<u8> {
    concat(&[iv, wrapped_key, ciphertext])
}

/// Split `IV || wrapped key || ciphertext` with a wrapped key of `wrapped_key_len` bytes
pub fn split_hybrid(bytes: &[u8], wrapped_key_len: usize) -> CryptoResult<HybridFrame<'_>> {
    let header = IV_LENGTH + wrapped_key_len;
    if bytes.len() < header {
        return Err(CryptoError::malformed(format!(
            "Hybrid payload must be at least {} bytes, got {}",
            header,
            bytes.len()
        )));
    }
    let (iv, rest) = bytes.split_at(IV_LENGTH);
    let (wrapped_key, ciphertext) = rest.split_at(wrapped_key_len);
    Ok(HybridFrame {
        iv,
        wrapped_key,
        ciphertext,
    })
}

/// Render a block as `encode(ciphertext) '|' encode(IV)`
pub fn join_secret_string(block: &EncryptedBlock, encoding: ByteEncoding) -> String {
    format!(
        "{}{}{}",
        encoding.encode(block.ciphertext()),
        SEPARATOR,
        encoding.encode(block.iv())
    )
}

/// Parse `encode(ciphertext) '|' encode(IV)`
pub fn split_secret_string(text: &str, encoding: ByteEncoding) -> CryptoResult<EncryptedBlock> {
    let fields: Vec<&str> = text.split(SEPARATOR).collect();
    if fields.len() != 2 {
        return Err(CryptoError::format(format!(
            "Expected 2 '{}'-separated fields, got {}",
            SEPARATOR,
            fields.len()
        )));
    }
    let ciphertext = encoding.decode(fields[0])?;
    let iv = encoding.decode(fields[1])?;
    if iv.len() != IV_LENGTH {
        return Err(CryptoError::format(format!(
            "IV field must decode to {} bytes, got {}",
            IV_LENGTH,
            iv.len()
        )));
    }
    EncryptedBlock::from_parts(ciphertext, &iv)
}

/// Parse the legacy `encode(IV) '|' encode(wrapped key) '|' encode(ciphertext)` string
///
/// Returns the wrapped key and the encrypted block.
pub fn split_legacy_hybrid_string(
    text: &str,
    encoding: ByteEncoding,
) -> CryptoResult<(Vec<u8>, EncryptedBlock)> {
    let fields: Vec<&str> = text.split(SEPARATOR).collect();
    if fields.len() != 3 {
        return Err(CryptoError::format(format!(
            "Expected 3 '{}'-separated fields, got {}",
            SEPARATOR,
            fields.len()
        )));
    }
    let iv = encoding.decode(fields[0])?;
    let wrapped_key = encoding.decode(fields[1])?;
    let ciphertext = encoding.decode(fields[2])?;
    if iv.len() != IV_LENGTH {
        return Err(CryptoError::format(format!(
            "IV field must decode to {} bytes, got {}",
            IV_LENGTH,
            iv.len()
        )));
    }
    Ok((wrapped_key, EncryptedBlock::from_parts(ciphertext, &iv)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_block() -> EncryptedBlock {
        EncryptedBlock::new((0u8..32).collect(), [0xa5; IV_LENGTH])
    }

    #[test]
    fn test_concat_preserves_order() {
        assert_eq!(concat(&[&b"ab"[..], &b""[..], &b"cde"[..]]), b"abcde".to_vec());
        assert!(concat(&[]).is_empty());
    }

    #[test]
    fn test_secret_frame_layout() {
        let block = sample_block();
        let framed = frame_secret(&block);
        assert_eq!(framed.len(), 48);
        assert_eq!(&framed[..16], &[0xa5u8; 16]);
        assert_eq!(split_secret(&framed).unwrap(), block);
    }

    #[test]
    fn test_split_secret_rejects_short_input() {
        assert!(matches!(
            split_secret(&[0u8; 15]),
            Err(CryptoError::MalformedInput { .. })
        ));
        // IV alone is structurally valid; the cipher rejects the empty ciphertext later
        assert!(split_secret(&[0u8; 16]).unwrap().ciphertext().is_empty());
    }

    #[test]
    fn test_hybrid_frame_layout() {
        let wrapped = vec![0x11u8; 256];
        let framed = frame_hybrid(&[0x22; 16], &wrapped, &[0x33; 32]);
        assert_eq!(framed.len(), 16 + 256 + 32);

        let frame = split_hybrid(&framed, 256).unwrap();
        assert_eq!(frame.iv, &[0x22u8; 16]);
        assert_eq!(frame.wrapped_key, wrapped.as_slice());
        assert_eq!(frame.ciphertext, &[0x33u8; 32]);
        assert_eq!(frame.to_block().unwrap().iv(), &[0x22u8; 16]);
    }

    #[test]
    fn test_split_hybrid_rejects_short_input() {
        assert!(matches!(
            split_hybrid(&[0u8; 16 + 255], 256),
            Err(CryptoError::MalformedInput { .. })
        ));
    }

    #[test]
    fn test_secret_string_framing() {
        let block = sample_block();
        for encoding in ByteEncoding::ALL {
            let text = join_secret_string(&block, encoding);
            assert_eq!(text.matches(SEPARATOR).count(), 1);
            assert_eq!(split_secret_string(&text, encoding).unwrap(), block);
        }
        let hex = join_secret_string(&block, ByteEncoding::UpperHex);
        assert!(hex.ends_with("|A5A5A5A5A5A5A5A5A5A5A5A5A5A5A5A5"));
    }

    #[test]
    fn test_secret_string_requires_exactly_one_separator() {
        for text in ["abcd", "AA==|AA==|AA==", ""] {
            assert!(matches!(
                split_secret_string(text, ByteEncoding::Base64),
                Err(CryptoError::Format { .. })
            ));
        }
    }

    #[test]
    fn test_secret_string_rejects_short_iv() {
        assert!(matches!(
            split_secret_string("00112233|0011", ByteEncoding::LowerHex),
            Err(CryptoError::Format { .. })
        ));
    }

    #[test]
    fn test_legacy_hybrid_string() {
        let text = format!("{}|{}|{}", "00".repeat(16), "ff".repeat(4), "ab".repeat(16));
        let (wrapped, block) = split_legacy_hybrid_string(&text, ByteEncoding::LowerHex).unwrap();
        assert_eq!(wrapped, vec![0xff; 4]);
        assert_eq!(block.iv(), &[0u8; 16]);
        assert_eq!(block.ciphertext(), &[0xabu8; 16]);

        assert!(matches!(
            split_legacy_hybrid_string("00|11", ByteEncoding::LowerHex),
            Err(CryptoError::Format { .. })
        ));
    }
}
