//! Error types for the gosetup installer CLI.
//!
//! This module defines the fatal error variants that terminate an
//! installation. Recoverable conditions (catalog outages, missing catalog
//! entries, PATH configuration failures) never reach this type: they are
//! handled by the fallback chains in [`crate::resolution`] and
//! [`crate::profile`] and reported as warnings.

use crate::download::DownloadError;
use crate::extraction::ExtractionError;
use crate::resolution::ResolutionError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort the installation process.
#[derive(Debug, Error)]
pub enum InstallerError {
    /// The user's home directory could not be determined.
    #[error("failed to get user home directory: {reason}")]
    HomeDirectory {
        /// Description of why the lookup failed.
        reason: String,
    },

    /// The detected architecture mapped to an empty string.
    #[error("could not map detected architecture '{detected}' to a supported Go architecture")]
    UnmappedArchitecture {
        /// The architecture string reported by the platform detector.
        detected: String,
    },

    /// No Go version could be resolved for installation.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// The resolved download URL has no usable file name.
    #[error("invalid download URL or file name extraction failed: {url}")]
    InvalidDownloadUrl {
        /// The URL that could not be turned into a file name.
        url: String,
    },

    /// The temporary download directory is missing and could not be created.
    #[error("failed to prepare temporary directory {}: {source}", path.display())]
    TempDirUnavailable {
        /// The temporary directory.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The temporary download directory exists but cannot be written.
    #[error("temporary directory {} is not writable; please check permissions", path.display())]
    TempDirNotWritable {
        /// The temporary directory.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The archive download failed.
    #[error("failed to download installation package: {0}")]
    Download(#[from] DownloadError),

    /// The downloaded archive does not match the catalog checksum.
    #[error("checksum mismatch for {}: expected {expected}, got {actual}", path.display())]
    ChecksumMismatch {
        /// The downloaded archive.
        path: PathBuf,
        /// Digest published in the release catalog.
        expected: String,
        /// Digest computed from the downloaded file.
        actual: String,
    },

    /// The downloaded archive could not be hashed.
    #[error("failed to compute checksum of {}: {source}", path.display())]
    ChecksumCompute {
        /// The downloaded archive.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Extraction of the archive failed.
    #[error("failed to extract installation package: {0}")]
    Extraction(#[from] ExtractionError),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using [`InstallerError`].
pub type Result<T> = std::result::Result<T, InstallerError>;
