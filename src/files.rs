//! Whole-file helpers for the encryption services

use crate::error::{CryptoError, CryptoResult};
use std::fs;
use std::path::Path;

/// Read `input`, apply `transform` to its full contents and write the result to `output`
///
/// The input is held entirely in memory. Files larger than `warn_above` bytes
/// are processed anyway, with a warning.
pub fn transform_file<F>(
    input: &Path,
    output: &Path,
    warn_above: u64,
    transform: F,
) -> CryptoResult<()>
where
    F: FnOnce(&[u8]) -> CryptoResult<Vec<u8>>,
{
    if !input.exists() {
        return Err(CryptoError::FileNotFound {
            path: input.to_path_buf(),
        });
    }

    let size = fs::metadata(input)?.len();
    if size > warn_above {
        log::warn!(
            "Processing large file {} ({} bytes) in memory",
            input.display(),
            size
        );
    }

    let contents = fs::read(input)?;
    let transformed = transform(&contents)?;
    fs::write(output, &transformed)?;

    log::debug!(
        "Transformed {} ({} bytes) into {} ({} bytes)",
        input.display(),
        contents.len(),
        output.display(),
        transformed.len()
    );
    Ok(())
}
