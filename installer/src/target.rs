//! Installation target directories.
//!
//! Go archives unpack into a top-level `go/` directory, so the archive is
//! extracted into the target's parent and the install root is the `go`
//! directory beneath it.

use crate::config::InstallConfig;
use crate::output::Reporter;
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use std::fs;
use std::io;

/// Parent directory for system-wide installs.
pub const SYSTEM_PARENT: &str = "/usr/local";

/// Name of the directory every Go archive unpacks into.
pub const GO_DIR_NAME: &str = "go";

/// Where Go is installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallTarget {
    parent: Utf8PathBuf,
    root: Utf8PathBuf,
}

impl InstallTarget {
    /// Install under `parent`, i.e. into `parent/go`.
    #[must_use]
    pub fn under(parent: impl Into<Utf8PathBuf>) -> Self {
        let parent = parent.into();
        let root = parent.join(GO_DIR_NAME);
        Self { parent, root }
    }

    /// The per-user target: `<home>/.local/go`.
    #[must_use]
    pub fn user(home: &Utf8Path) -> Self {
        Self::under(home.join(".local"))
    }

    /// The system-wide target: `/usr/local/go`.
    #[must_use]
    pub fn system() -> Self {
        Self::under(SYSTEM_PARENT)
    }

    /// Choose the target for a run: system-wide only in effective root mode.
    #[must_use]
    pub fn for_config(config: &InstallConfig) -> Self {
        if config.is_system_wide() {
            Self::system()
        } else {
            Self::user(&config.home_dir)
        }
    }

    /// Directory the archive is extracted into.
    #[must_use]
    pub fn parent(&self) -> &Utf8Path {
        &self.parent
    }

    /// The Go installation root (`GOROOT`).
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// The directory holding the `go` and `gofmt` binaries.
    #[must_use]
    pub fn bin_dir(&self) -> Utf8PathBuf {
        self.root.join("bin")
    }

    /// Remove any previous installation at the install root.
    ///
    /// A missing root is not an error. Failure to remove an existing root
    /// is reported as a warning and the installation continues.
    ///
    /// Returns whether a previous installation was removed.
    pub fn remove_previous(&self, reporter: &mut Reporter<'_>) -> bool {
        debug!("Checking installation path for cleanup: {}", self.root);
        match fs::symlink_metadata(&self.root) {
            Ok(_) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!("Old installation directory not found, skipping cleanup");
                return false;
            }
            Err(err) => {
                reporter.warn(format_args!(
                    "Failed to inspect old installation directory {}: {err}",
                    self.root
                ));
                return false;
            }
        }

        debug!("Old installation directory found, removing...");
        let removal = if self.root.is_dir() && !self.root.is_symlink() {
            fs::remove_dir_all(&self.root)
        } else {
            fs::remove_file(&self.root)
        };
        match removal {
            Ok(()) => {
                debug!("Old installation directory cleaned up");
                true
            }
            Err(err) => {
                reporter.warn(format_args!(
                    "Failed to clean up old installation directory: {err}"
                ));
                false
            }
        }
    }
}
