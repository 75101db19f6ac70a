//! End-to-end installation orchestration.
//!
//! This module sequences the installer stages: platform detection,
//! catalog lookup and version resolution, download and verification,
//! replacement of the previous installation, extraction, and PATH
//! configuration. Every network and archive seam is a trait object in
//! [`Collaborators`], so the whole pipeline runs against stubs in tests.

use crate::catalog::{Release, ReleaseSource};
use crate::config::InstallConfig;
use crate::download::{Downloader, prepare_download_dir, require_archive_file_name};
use crate::error::{InstallerError, Result};
use crate::extraction::ArchiveExtractor;
use crate::output::{Reporter, completion_message};
use crate::platform::{HostPlatform, PlatformDetector, host_os, map_architecture};
use crate::profile::{PathConfiguration, configure_path, profile_chain};
use crate::resolution::{ResolutionContext, ResolutionSource, resolve_release};
use crate::target::InstallTarget;
use crate::verification::verify_checksum;
use camino::Utf8PathBuf;
use log::debug;
use std::fs;
use std::path::Path;

/// The I/O seams the pipeline drives.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    /// Host architecture detection.
    pub detector: &'a dyn PlatformDetector,
    /// Release catalog and latest-version lookups.
    pub source: &'a dyn ReleaseSource,
    /// Archive download.
    pub downloader: &'a dyn Downloader,
    /// Archive extraction.
    pub extractor: &'a dyn ArchiveExtractor,
}

/// Summary of a completed installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    /// Installed version, without the `go` prefix.
    pub version: String,
    /// URL the archive was downloaded from.
    pub url: String,
    /// How the URL was resolved.
    pub source: ResolutionSource,
    /// The Go installation root.
    pub install_root: Utf8PathBuf,
    /// Number of files written by extraction.
    pub files_extracted: usize,
    /// Outcome of PATH configuration.
    pub path_configuration: PathConfiguration,
}

/// Run a complete installation.
///
/// Status lines and warnings go to `reporter`; recoverable conditions
/// (detection failure, catalog outage, cleanup and PATH problems) are
/// reported there and do not fail the run.
///
/// # Errors
///
/// Returns an [`InstallerError`] for any fatal condition: an unmappable
/// architecture, an unresolvable version, an unusable temporary directory
/// or download URL, a failed download, a checksum mismatch, or a failed
/// extraction.
pub fn run_install(
    config: &InstallConfig,
    collaborators: &Collaborators<'_>,
    reporter: &mut Reporter<'_>,
) -> Result<InstallReport> {
    debug!("Debug mode enabled");
    reporter.line("Starting Go environment installation (rootless by default)");

    let arch = resolve_architecture(collaborators.detector, reporter)?;
    let host = HostPlatform::new(host_os(), arch);
    debug!("Host platform: {host}");

    let target = InstallTarget::for_config(config);
    reporter.line(format_args!("Installation path set to: {}", target.root()));

    let catalog = fetch_catalog(collaborators.source, reporter);
    let context = ResolutionContext {
        host: &host,
        download_base: &config.endpoints.download_base,
        catalog: catalog.as_deref(),
    };
    let resolved = resolve_release(
        &config.version_request(),
        &context,
        collaborators.source,
        reporter,
    )?;
    debug!("Resolved {} via {}", resolved.version, resolved.source);
    reporter.line(format_args!("Confirmed download URL: {}", resolved.url));

    let file_name = require_archive_file_name(&resolved.url)?;
    prepare_download_dir(&config.temp_dir)?;
    let archive_path = config.temp_dir.join(file_name);
    debug!("Download file path: {}", archive_path.display());

    reporter.line("Downloading installation package...");
    let bytes = collaborators
        .downloader
        .download(&resolved.url, &archive_path)?;
    debug!("Downloaded {bytes} bytes");
    reporter.line(format_args!(
        "Installation package downloaded successfully: {}",
        archive_path.display()
    ));

    if let Some(expected) = &resolved.checksum {
        verify_download(&archive_path, expected, reporter)?;
    }

    reporter.line("Cleaning up old installation directory (if exists)....");
    target.remove_previous(reporter);

    reporter.line(format_args!(
        "Extracting installation package to {}...",
        target.root()
    ));
    debug!("Extracting {} to {}", archive_path.display(), target.parent());
    let files_extracted = collaborators
        .extractor
        .extract(&archive_path, target.parent().as_std_path())?;
    reporter.line("Extraction complete");

    remove_archive(&archive_path, reporter);

    if config.root_request_ignored() {
        reporter.warn(
            "--root flag set, but not running with root privileges. \
             Falling back to user configuration.",
        );
    } else if !config.is_system_wide() {
        reporter.line("Configuring PATH for current user...");
    }
    let chain = profile_chain(config.is_system_wide(), &config.home_dir);
    let path_configuration = configure_path(&chain, &target.bin_dir(), reporter);

    reporter.line(completion_message(&resolved.version));
    Ok(InstallReport {
        version: resolved.version,
        url: resolved.url,
        source: resolved.source,
        install_root: target.root().to_owned(),
        files_extracted,
        path_configuration,
    })
}

/// Detect and normalize the host architecture.
///
/// Detection failure falls back to the build-default architecture with a
/// warning. A detected architecture that maps to nothing is fatal.
///
/// # Errors
///
/// Returns [`InstallerError::UnmappedArchitecture`] when the detected
/// architecture maps to an empty string.
pub fn resolve_architecture(
    detector: &dyn PlatformDetector,
    reporter: &mut Reporter<'_>,
) -> Result<String> {
    match detector.detect() {
        Ok(info) => {
            reporter.line(format_args!(
                "System Info: Kernel Version {}, Detected Architecture {}",
                info.kernel_version, info.architecture
            ));
            let arch = map_architecture(&info.architecture);
            if arch.is_empty() {
                return Err(InstallerError::UnmappedArchitecture {
                    detected: info.architecture,
                });
            }
            reporter.line(format_args!("Mapped Go Architecture: {arch}"));
            Ok(arch)
        }
        Err(err) => {
            reporter.warn(format_args!("Failed to get system information: {err}"));
            let arch = err.default_architecture().to_owned();
            reporter.warn(format_args!(
                "Will use Go's build time system and architecture ({}/{arch})",
                host_os()
            ));
            Ok(arch)
        }
    }
}

/// Fetch the catalog, degrading to `None` on any failure.
fn fetch_catalog(source: &dyn ReleaseSource, reporter: &mut Reporter<'_>) -> Option<Vec<Release>> {
    match source.fetch_catalog() {
        Ok(releases) => Some(releases),
        Err(err) => {
            reporter.warn(format_args!(
                "Failed to get Go version list from the release catalog: {err}"
            ));
            None
        }
    }
}

fn verify_download(archive_path: &Path, expected: &str, reporter: &mut Reporter<'_>) -> Result<()> {
    if let Err(err) = verify_checksum(archive_path, expected) {
        if let Err(remove_err) = fs::remove_file(archive_path) {
            debug!(
                "Failed to remove rejected download {}: {remove_err}",
                archive_path.display()
            );
        }
        return Err(err);
    }
    reporter.line("SHA-256 checksum verified");
    Ok(())
}

fn remove_archive(archive_path: &Path, reporter: &mut Reporter<'_>) {
    reporter.line("Cleaning up downloaded installation package...");
    debug!("Removing downloaded file: {}", archive_path.display());
    match fs::remove_file(archive_path) {
        Ok(()) => reporter.line("Installation package cleaned up"),
        Err(err) => reporter.warn(format_args!(
            "Failed to clean up installation package: {err}"
        )),
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
