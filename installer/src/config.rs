//! Run configuration for the installer.
//!
//! All settings that influence a run are gathered once at startup into an
//! [`InstallConfig`] and passed by reference to each stage, so no stage
//! reads process-global state.

use crate::cli::Cli;
use crate::dirs::BaseDirs;
use crate::error::{InstallerError, Result};
use crate::resolution::VersionRequest;
use camino::Utf8PathBuf;
use std::path::PathBuf;

/// Environment variable overriding the catalog URL.
pub const CATALOG_URL_ENV: &str = "GOSETUP_CATALOG_URL";
/// Environment variable overriding the latest-version URL.
pub const LATEST_URL_ENV: &str = "GOSETUP_LATEST_URL";
/// Environment variable overriding the archive download base URL.
pub const DOWNLOAD_BASE_ENV: &str = "GOSETUP_DOWNLOAD_BASE";

const DEFAULT_CATALOG_URL: &str = "https://go.dev/dl/?mode=json";
const DEFAULT_LATEST_URL: &str = "https://go.dev/VERSION?m=text";
const DEFAULT_DOWNLOAD_BASE: &str = "https://go.dev/dl";

/// Remote endpoints consulted during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// JSON release catalog.
    pub catalog_url: String,
    /// Plaintext latest-version endpoint.
    pub latest_url: String,
    /// Base URL that archive file names are appended to.
    pub download_base: String,
}

impl Default for Endpoints {
    /// The public go.dev endpoints.
    fn default() -> Self {
        Self {
            catalog_url: DEFAULT_CATALOG_URL.to_owned(),
            latest_url: DEFAULT_LATEST_URL.to_owned(),
            download_base: DEFAULT_DOWNLOAD_BASE.to_owned(),
        }
    }
}

impl Endpoints {
    /// Read endpoint overrides from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build endpoints from an arbitrary variable lookup.
    ///
    /// Unset or blank variables keep the go.dev default. A trailing `/` on
    /// the download base is removed.
    ///
    /// # Examples
    ///
    /// ```
    /// use gosetup::config::{DOWNLOAD_BASE_ENV, Endpoints};
    ///
    /// let endpoints = Endpoints::from_lookup(|key| {
    ///     (key == DOWNLOAD_BASE_ENV).then(|| "https://mirror.test/go/".to_owned())
    /// });
    /// assert_eq!(endpoints.download_base, "https://mirror.test/go");
    /// assert_eq!(endpoints.catalog_url, Endpoints::default().catalog_url);
    /// ```
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let pick = |key: &str, default: &str| {
            lookup(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| default.to_owned())
        };
        Self {
            catalog_url: pick(CATALOG_URL_ENV, DEFAULT_CATALOG_URL),
            latest_url: pick(LATEST_URL_ENV, DEFAULT_LATEST_URL),
            download_base: pick(DOWNLOAD_BASE_ENV, DEFAULT_DOWNLOAD_BASE)
                .trim_end_matches('/')
                .to_owned(),
        }
    }
}

/// Configuration for one installation run.
#[derive(Debug, Clone)]
pub struct InstallConfig {
    /// Versions requested on the command line, in order.
    pub requested_versions: Vec<String>,
    /// Whether debug output is enabled.
    pub debug: bool,
    /// Whether `--root` was passed.
    pub root_requested: bool,
    /// Whether the process runs with an effective UID of 0.
    pub is_privileged: bool,
    /// The invoking user's home directory.
    pub home_dir: Utf8PathBuf,
    /// Directory the archive is downloaded into.
    pub temp_dir: PathBuf,
    /// Remote endpoints.
    pub endpoints: Endpoints,
}

impl InstallConfig {
    /// Build the configuration from parsed CLI arguments.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::HomeDirectory`] if the home directory
    /// cannot be determined or is not valid UTF-8.
    pub fn from_cli(
        cli: &Cli,
        dirs: &dyn BaseDirs,
        is_privileged: bool,
        endpoints: Endpoints,
    ) -> Result<Self> {
        let home = dirs
            .home_dir()
            .ok_or_else(|| InstallerError::HomeDirectory {
                reason: "no home directory could be determined".to_owned(),
            })?;
        let home_dir =
            Utf8PathBuf::try_from(home).map_err(|e| InstallerError::HomeDirectory {
                reason: format!("home directory is not valid UTF-8: {e}"),
            })?;

        Ok(Self {
            requested_versions: cli.versions.clone(),
            debug: cli.debug,
            root_requested: cli.root,
            is_privileged,
            home_dir,
            temp_dir: std::env::temp_dir(),
            endpoints,
        })
    }

    /// Whether installation and PATH configuration are system-wide.
    ///
    /// Root mode only takes effect when the process is privileged.
    #[must_use]
    pub fn is_system_wide(&self) -> bool {
        self.root_requested && self.is_privileged
    }

    /// Whether `--root` was requested without the privilege to honour it.
    #[must_use]
    pub fn root_request_ignored(&self) -> bool {
        self.root_requested && !self.is_privileged
    }

    /// The version request described by the CLI candidates.
    #[must_use]
    pub fn version_request(&self) -> VersionRequest {
        VersionRequest::from_candidates(&self.requested_versions)
    }
}

/// Whether the process runs with an effective UID of 0.
#[must_use]
pub fn running_as_root() -> bool {
    #[cfg(unix)]
    {
        nix::unistd::geteuid().is_root()
    }
    #[cfg(not(unix))]
    {
        false
    }
}
