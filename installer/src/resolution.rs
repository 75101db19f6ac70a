//! Version resolution and download URL synthesis.
//!
//! Resolution always yields exactly one [`ResolvedRelease`] or a fatal
//! [`ResolutionError`]. A requested version missing from the catalog is not
//! an error: the download URL is synthesized from the go.dev naming scheme
//! and the download itself decides whether the release exists. Latest
//! resolution prefers the first stable catalog entry with a matching
//! archive and falls back to the plaintext latest-version endpoint.

use crate::catalog::{CatalogError, Release, ReleaseSource};
use crate::output::Reporter;
use crate::platform::HostPlatform;
use log::debug;
use std::fmt;

/// What the user asked to install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionRequest {
    /// The latest stable release.
    Latest,
    /// Explicit version candidates, in command-line order.
    Candidates(Vec<String>),
}

impl VersionRequest {
    /// Build a request from CLI candidates; no candidates means latest.
    #[must_use]
    pub fn from_candidates(candidates: &[String]) -> Self {
        if candidates.is_empty() {
            Self::Latest
        } else {
            Self::Candidates(candidates.to_vec())
        }
    }
}

/// Where a resolved download URL came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionSource {
    /// A matching archive listed in the release catalog.
    Catalog,
    /// Constructed for a requested version absent from the catalog.
    Synthesized,
    /// Constructed from the plaintext latest-version endpoint.
    LatestText,
}

impl fmt::Display for ResolutionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Catalog => write!(f, "catalog"),
            Self::Synthesized => write!(f, "synthesized"),
            Self::LatestText => write!(f, "latest-text"),
        }
    }
}

/// The single release chosen for installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRelease {
    /// Version without the `go` prefix, e.g. `1.22.2`.
    pub version: String,
    /// Archive download URL.
    pub url: String,
    /// Expected SHA-256 from the catalog, when the URL came from it.
    pub checksum: Option<String>,
    /// How the URL was obtained.
    pub source: ResolutionSource,
}

/// Errors that make resolution impossible.
#[derive(Debug, thiserror::Error)]
pub enum ResolutionError {
    /// Neither the catalog nor the latest-version endpoint produced a version.
    #[error("could not determine Go version to install: {source}")]
    Unresolvable {
        /// Failure of the latest-version lookup.
        #[source]
        source: CatalogError,
    },

    /// A candidate request carried no versions.
    #[error("no Go version candidates were supplied")]
    NoCandidates,
}

/// Inputs shared by every resolution strategy.
#[derive(Debug, Clone, Copy)]
pub struct ResolutionContext<'a> {
    /// Host OS and canonical architecture.
    pub host: &'a HostPlatform,
    /// Base URL that archive file names are appended to.
    pub download_base: &'a str,
    /// The release catalog, when it could be fetched.
    pub catalog: Option<&'a [Release]>,
}

/// Append `.0` to versions containing exactly one dot.
///
/// # Examples
///
/// ```
/// use gosetup::resolution::normalize_version;
///
/// assert_eq!(normalize_version("1.22"), "1.22.0");
/// assert_eq!(normalize_version("1.22.3"), "1.22.3");
/// assert_eq!(normalize_version("1"), "1");
/// ```
#[must_use]
pub fn normalize_version(requested: &str) -> String {
    if requested.matches('.').count() == 1 {
        format!("{requested}.0")
    } else {
        requested.to_owned()
    }
}

/// URL of a catalog file under the download base.
#[must_use]
pub fn catalog_archive_url(download_base: &str, filename: &str) -> String {
    format!("{download_base}/{filename}")
}

/// URL constructed from the go.dev archive naming scheme.
///
/// # Examples
///
/// ```
/// use gosetup::platform::HostPlatform;
/// use gosetup::resolution::synthesized_archive_url;
///
/// let host = HostPlatform::new("linux", "arm64");
/// assert_eq!(
///     synthesized_archive_url("https://go.dev/dl", "1.21.0", &host),
///     "https://go.dev/dl/go1.21.0.linux-arm64.tar.gz",
/// );
/// ```
#[must_use]
pub fn synthesized_archive_url(download_base: &str, version: &str, host: &HostPlatform) -> String {
    format!(
        "{download_base}/go{version}.{os}-{arch}.tar.gz",
        os = host.os,
        arch = host.arch
    )
}

/// Resolve a request to exactly one release.
///
/// # Errors
///
/// Returns [`ResolutionError::Unresolvable`] when latest resolution has to
/// fall back to the plaintext endpoint and that lookup fails, and
/// [`ResolutionError::NoCandidates`] for an empty candidate list.
pub fn resolve_release(
    request: &VersionRequest,
    context: &ResolutionContext<'_>,
    source: &dyn ReleaseSource,
    reporter: &mut Reporter<'_>,
) -> Result<ResolvedRelease, ResolutionError> {
    match request {
        VersionRequest::Candidates(candidates) => resolve_requested(candidates, context, reporter),
        VersionRequest::Latest => resolve_latest(context, source, reporter),
    }
}

/// Resolve explicitly requested versions.
///
/// The first candidate decides the outcome: a catalog match wins, otherwise
/// its URL is synthesized. Later candidates are never consulted.
///
/// # Errors
///
/// Returns [`ResolutionError::NoCandidates`] if `candidates` is empty.
pub fn resolve_requested(
    candidates: &[String],
    context: &ResolutionContext<'_>,
    reporter: &mut Reporter<'_>,
) -> Result<ResolvedRelease, ResolutionError> {
    debug!("Target versions specified: {candidates:?}");
    let Some((requested, remaining)) = candidates.split_first() else {
        return Err(ResolutionError::NoCandidates);
    };
    if !remaining.is_empty() {
        debug!("Resolution stops at the first requested version; not consulting {remaining:?}");
    }

    let version = normalize_version(requested);
    if version != *requested {
        debug!("Appended .0 to version: {requested} -> {version}");
    }

    if let Some(resolved) = context
        .catalog
        .and_then(|catalog| find_requested(catalog, &version, context))
    {
        return Ok(resolved);
    }

    reporter.warn(format_args!(
        "Could not find specified version {requested} ({}) in the release catalog. \
         Attempting to construct URL...",
        context.host
    ));
    let url = synthesized_archive_url(context.download_base, &version, context.host);
    reporter.line(format_args!("Attempting to construct download URL: {url}"));
    Ok(ResolvedRelease {
        version,
        url,
        checksum: None,
        source: ResolutionSource::Synthesized,
    })
}

/// Resolve the latest stable release.
///
/// # Errors
///
/// Returns [`ResolutionError::Unresolvable`] if no stable catalog entry
/// matches and the latest-version endpoint fails.
pub fn resolve_latest(
    context: &ResolutionContext<'_>,
    source: &dyn ReleaseSource,
    reporter: &mut Reporter<'_>,
) -> Result<ResolvedRelease, ResolutionError> {
    debug!("No target version specified");
    if let Some(resolved) = context
        .catalog
        .and_then(|catalog| find_latest_stable(catalog, context))
    {
        reporter.line(format_args!(
            "No version specified, installing latest stable version: {}",
            resolved.version
        ));
        return Ok(resolved);
    }

    reporter.warn(
        "Could not find latest stable version in the release catalog. \
         Attempting to get the latest version from the version endpoint...",
    );
    let version = source
        .fetch_latest_version()
        .map_err(|source| ResolutionError::Unresolvable { source })?;
    let url = synthesized_archive_url(context.download_base, &version, context.host);
    reporter.line(format_args!(
        "Deduced latest version: {version}, Constructed download URL: {url}"
    ));
    reporter.line(format_args!(
        "No version specified, installing latest stable version: {version}"
    ));
    Ok(ResolvedRelease {
        version,
        url,
        checksum: None,
        source: ResolutionSource::LatestText,
    })
}

/// Find the catalog archive for an exact (normalized) version.
fn find_requested(
    catalog: &[Release],
    version: &str,
    context: &ResolutionContext<'_>,
) -> Option<ResolvedRelease> {
    catalog
        .iter()
        .filter(|release| release.bare_version() == version)
        .find_map(|release| {
            debug!("Found matching version in the release catalog: {}", release.version);
            resolved_from_catalog(release, context)
        })
}

/// Find the first stable release with an archive for the host.
fn find_latest_stable(
    catalog: &[Release],
    context: &ResolutionContext<'_>,
) -> Option<ResolvedRelease> {
    catalog.iter().find_map(|release| {
        if release.stable {
            debug!("Checking stable version: {}", release.version);
            resolved_from_catalog(release, context)
        } else {
            debug!("Skipping non-stable version: {}", release.version);
            None
        }
    })
}

fn resolved_from_catalog(
    release: &Release,
    context: &ResolutionContext<'_>,
) -> Option<ResolvedRelease> {
    let Some(file) = release.archive_for(context.host) else {
        debug!(
            "No archive for {} in {}; files: {:?}",
            context.host,
            release.version,
            release
                .files
                .iter()
                .map(|file| file.filename.as_str())
                .collect::<Vec<_>>()
        );
        return None;
    };
    debug!(
        "Found matching download file for {}: {}",
        context.host, file.filename
    );
    Some(ResolvedRelease {
        version: release.bare_version().to_owned(),
        url: catalog_archive_url(context.download_base, &file.filename),
        checksum: (!file.checksum.is_empty()).then(|| file.checksum.clone()),
        source: ResolutionSource::Catalog,
    })
}

#[cfg(test)]
#[path = "resolution_tests.rs"]
mod tests;
