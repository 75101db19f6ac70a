//! Integrity checks for downloaded archives.
//!
//! The release catalog publishes a SHA-256 digest for each archive. When
//! one is available the downloaded file is hashed and compared before
//! anything is extracted. URLs synthesized without the catalog carry no
//! digest and are not verified.

use crate::error::{InstallerError, Result};
use log::debug;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// Compute the lowercase hex SHA-256 digest of a file.
///
/// # Errors
///
/// Returns any I/O error raised while opening or reading the file.
pub fn compute_sha256(path: &Path) -> io::Result<String> {
    let mut file = fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];
    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}

/// Verify that the file at `path` hashes to `expected`.
///
/// The comparison ignores ASCII case.
///
/// # Errors
///
/// Returns [`InstallerError::ChecksumCompute`] if the file cannot be read
/// and [`InstallerError::ChecksumMismatch`] if the digests differ.
pub fn verify_checksum(path: &Path, expected: &str) -> Result<()> {
    let actual = compute_sha256(path).map_err(|source| InstallerError::ChecksumCompute {
        path: path.to_path_buf(),
        source,
    })?;
    if !actual.eq_ignore_ascii_case(expected.trim()) {
        return Err(InstallerError::ChecksumMismatch {
            path: path.to_path_buf(),
            expected: expected.trim().to_owned(),
            actual,
        });
    }
    debug!("SHA-256 verified for {}: {actual}", path.display());
    Ok(())
}
