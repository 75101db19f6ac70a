//! Directory resolution abstraction.
//!
//! Wraps `directories-next` behind a trait so configuration can be built
//! against a fixed home directory in tests.

use std::path::PathBuf;

/// Provides platform-specific base directories.
pub trait BaseDirs {
    /// Return the current user's home directory, if it can be determined.
    fn home_dir(&self) -> Option<PathBuf>;
}

/// [`BaseDirs`] implementation backed by the host environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemBaseDirs;

impl BaseDirs for SystemBaseDirs {
    fn home_dir(&self) -> Option<PathBuf> {
        directories_next::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
    }
}
