//! Byte and text encodings
//!
//! [`ByteEncoding`] selects how binary output (ciphertext, signatures, digests)
//! is rendered as text. [`TextEncoding`] selects how a string is turned into
//! bytes before it is signed or verified.

use crate::error::{CryptoError, CryptoResult};
use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Textual representation for binary payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ByteEncoding {
    /// Two uppercase hex digits per byte
    UpperHex,
    /// Two lowercase hex digits per byte
    LowerHex,
    /// Standard base64 alphabet with padding
    #[default]
    Base64,
}

impl ByteEncoding {
    /// All supported encodings
    pub const ALL: [ByteEncoding; 3] = [
        ByteEncoding::UpperHex,
        ByteEncoding::LowerHex,
        ByteEncoding::Base64,
    ];

    /// Encode bytes; the empty sequence encodes to the empty string
    pub fn encode(self, bytes: &[u8]) -> String {
        match self {
            ByteEncoding::UpperHex => hex::encode_upper(bytes),
            ByteEncoding::LowerHex => hex::encode(bytes),
            ByteEncoding::Base64 => general_purpose::STANDARD.encode(bytes),
        }
    }

    /// Decode text produced by [`ByteEncoding::encode`]
    ///
    /// Hex input is case-normalized to this variant's case first, so both
    /// `"0A"` and `"0a"` decode under either hex variant.
    pub fn decode(self, text: &str) -> CryptoResult<Vec<u8>> {
        match self {
            ByteEncoding::UpperHex => hex::decode(text.to_ascii_uppercase())
                .map_err(|e| CryptoError::format(format!("Invalid hex input: {}", e))),
            ByteEncoding::LowerHex => hex::decode(text.to_ascii_lowercase())
                .map_err(|e| CryptoError::format(format!("Invalid hex input: {}", e))),
            ByteEncoding::Base64 => general_purpose::STANDARD
                .decode(text)
                .map_err(|e| CryptoError::format(format!("Invalid base64 input: {}", e))),
        }
    }

    fn name(self) -> &'static str {
        match self {
            ByteEncoding::UpperHex => "upper-hex",
            ByteEncoding::LowerHex => "lower-hex",
            ByteEncoding::Base64 => "base64",
        }
    }
}

impl fmt::Display for ByteEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ByteEncoding {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HEX" | "upper-hex" => Ok(ByteEncoding::UpperHex),
            "hex" | "lower-hex" => Ok(ByteEncoding::LowerHex),
            "BASE64" | "base64" => Ok(ByteEncoding::Base64),
            other => Err(CryptoError::format(format!(
                "Unknown byte encoding: {}",
                other
            ))),
        }
    }
}

/// Encode bytes with the given encoding
pub fn encode(bytes: &[u8], encoding: ByteEncoding) -> String {
    encoding.encode(bytes)
}

/// Encode optional bytes; an absent input yields an absent result
pub fn encode_opt(bytes: Option<&[u8]>, encoding: ByteEncoding) -> Option<String> {
    bytes.map(|b| encoding.encode(b))
}

/// Decode text with the given encoding
pub fn decode(text: &str, encoding: ByteEncoding) -> CryptoResult<Vec<u8>> {
    encoding.decode(text)
}

/// Character encoding applied to strings before signing or verifying
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextEncoding {
    #[default]
    Utf8,
    Utf16Le,
    Utf16Be,
    /// 7-bit ASCII; characters outside the range become `?`
    Ascii,
}

impl TextEncoding {
    /// Convert a string into bytes
    pub fn encode(self, text: &str) -> Vec<u8> {
        match self {
            TextEncoding::Utf8 => text.as_bytes().to_vec(),
            TextEncoding::Utf16Le => text.encode_utf16().flat_map(u16::to_le_bytes).collect(),
            TextEncoding::Utf16Be => text.encode_utf16().flat_map(u16::to_be_bytes).collect(),
            TextEncoding::Ascii => text
                .chars()
                .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
                .collect(),
        }
    }

    /// Convert bytes back into a string
    pub fn decode(self, bytes: &[u8]) -> CryptoResult<String> {
        match self {
            TextEncoding::Utf8 => String::from_utf8(bytes.to_vec())
                .map_err(|e| CryptoError::format(format!("Invalid UTF-8: {}", e))),
            TextEncoding::Utf16Le | TextEncoding::Utf16Be => {
                if bytes.len() % 2 != 0 {
                    return Err(CryptoError::format("UTF-16 input has odd length"));
                }
                let units: Vec<u16> = bytes
                    .chunks_exact(2)
                    .map(|pair| match self {
                        TextEncoding::Utf16Le => u16::from_le_bytes([pair[0], pair[1]]),
                        _ => u16::from_be_bytes([pair[0], pair[1]]),
                    })
                    .collect();
                String::from_utf16(&units)
                    .map_err(|e| CryptoError::format(format!("Invalid UTF-16: {}", e)))
            }
            TextEncoding::Ascii => {
                if !bytes.is_ascii() {
                    return Err(CryptoError::format("Input is not 7-bit ASCII"));
                }
                // ASCII is a subset of UTF-8
                String::from_utf8(bytes.to_vec())
                    .map_err(|e| CryptoError::format(format!("Invalid ASCII: {}", e)))
            }
        }
    }
}
