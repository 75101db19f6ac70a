//! Parsing for the catalog JSON and the latest-version text endpoint.

use super::error::CatalogError;
use super::release::{Release, VERSION_PREFIX};

/// Parse the catalog JSON into releases.
///
/// # Errors
///
/// Returns [`CatalogError::Parse`] for malformed JSON and
/// [`CatalogError::Empty`] when the array has no entries.
///
/// # Examples
///
/// ```
/// use gosetup::catalog::parse_catalog;
///
/// let json = r#"[{"version":"go1.22.2","stable":true,"files":[
///     {"filename":"go1.22.2.linux-amd64.tar.gz","os":"linux",
///      "arch":"amd64","sha256":"ab","size":1,"kind":"archive"}]}]"#;
/// let releases = parse_catalog(json).expect("valid catalog");
/// assert_eq!(releases[0].bare_version(), "1.22.2");
/// ```
pub fn parse_catalog(json: &str) -> Result<Vec<Release>, CatalogError> {
    let releases: Vec<Release> = serde_json::from_str(json)?;
    if releases.is_empty() {
        return Err(CatalogError::Empty);
    }
    Ok(releases)
}

/// Parse the plaintext latest-version response.
///
/// The body's first line must start with `go`; the prefix is stripped.
/// Later lines (go.dev appends a build timestamp) are ignored.
///
/// # Errors
///
/// Returns [`CatalogError::UnexpectedFormat`] if the body is blank or the
/// first line lacks the prefix.
///
/// # Examples
///
/// ```
/// use gosetup::catalog::parse_latest_version;
///
/// let version = parse_latest_version("go1.23.4\ntime 2024-12-03T22:34:21Z\n");
/// assert_eq!(version.expect("valid"), "1.23.4");
/// ```
pub fn parse_latest_version(text: &str) -> Result<String, CatalogError> {
    let first_line = text.trim().lines().next().unwrap_or_default().trim();
    match first_line.strip_prefix(VERSION_PREFIX) {
        Some(version) if !version.is_empty() => Ok(version.to_owned()),
        _ => Err(CatalogError::UnexpectedFormat {
            found: first_line.to_owned(),
        }),
    }
}
