//! Release catalog retrieval.
//!
//! Provides a trait-based abstraction over the two go.dev endpoints so the
//! resolver can be exercised without network access.

use super::error::CatalogError;
use super::parser::{parse_catalog, parse_latest_version};
use super::release::Release;
use crate::config::Endpoints;
use crate::http::{self, RequestFailure};
use log::debug;

/// Source of release information.
///
/// # Examples
///
/// ```no_run
/// use gosetup::catalog::{HttpReleaseSource, ReleaseSource};
/// use gosetup::config::Endpoints;
///
/// let source = HttpReleaseSource::new(&Endpoints::default());
/// let releases = source.fetch_catalog()?;
/// println!("{} releases listed", releases.len());
/// # Ok::<(), gosetup::catalog::CatalogError>(())
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait ReleaseSource {
    /// Fetch and parse the full release catalog.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Network`] on transport failure,
    /// [`CatalogError::HttpStatus`] on a non-200 response,
    /// [`CatalogError::Parse`] on malformed JSON, and
    /// [`CatalogError::Empty`] when no releases are listed.
    fn fetch_catalog(&self) -> Result<Vec<Release>, CatalogError>;

    /// Fetch the latest released version, without its `go` prefix.
    ///
    /// # Errors
    ///
    /// Returns a transport or status error as for
    /// [`fetch_catalog`](Self::fetch_catalog), or
    /// [`CatalogError::UnexpectedFormat`] when the body is not a
    /// `go<version>` line.
    fn fetch_latest_version(&self) -> Result<String, CatalogError>;
}

/// HTTP-based release source using `ureq`.
#[derive(Debug, Clone)]
pub struct HttpReleaseSource {
    catalog_url: String,
    latest_url: String,
}

impl HttpReleaseSource {
    /// Create a source reading from the configured endpoints.
    #[must_use]
    pub fn new(endpoints: &Endpoints) -> Self {
        Self {
            catalog_url: endpoints.catalog_url.clone(),
            latest_url: endpoints.latest_url.clone(),
        }
    }
}

impl ReleaseSource for HttpReleaseSource {
    fn fetch_catalog(&self) -> Result<Vec<Release>, CatalogError> {
        debug!("Fetching all Go version information from {}", self.catalog_url);
        let body = fetch_text(&self.catalog_url)?;
        let releases = parse_catalog(&body)?;
        debug!("Fetched {} Go versions from the release catalog", releases.len());
        Ok(releases)
    }

    fn fetch_latest_version(&self) -> Result<String, CatalogError> {
        let body = fetch_text(&self.latest_url)?;
        let version = parse_latest_version(&body)?;
        debug!("Got latest version from {}: {version}", self.latest_url);
        Ok(version)
    }
}

/// Download a URL and return the body as a string.
fn fetch_text(url: &str) -> Result<String, CatalogError> {
    let response = http::get(url).map_err(|failure| map_request_failure(url, failure))?;
    response
        .into_body()
        .read_to_string()
        .map_err(|e| CatalogError::Network {
            url: url.to_owned(),
            reason: format!("failed to read response body: {e}"),
        })
}

/// Map a request failure to a [`CatalogError`].
fn map_request_failure(url: &str, failure: RequestFailure) -> CatalogError {
    match failure {
        RequestFailure::Status(status) => CatalogError::HttpStatus {
            url: url.to_owned(),
            status,
        },
        RequestFailure::Transport(reason) => CatalogError::Network {
            url: url.to_owned(),
            reason,
        },
    }
}
