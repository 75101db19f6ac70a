//! Release catalog entries.
//!
//! Mirrors the JSON shape served by go.dev. Fields the installer does not
//! use are ignored during deserialization; `checksum` and `size` default
//! when absent so older or trimmed catalogs still parse.

use crate::platform::HostPlatform;
use serde::Deserialize;

/// Prefix carried by every catalog version string (`go1.22.2`).
pub const VERSION_PREFIX: &str = "go";

/// The `kind` value marking a binary distribution archive.
pub const ARCHIVE_KIND: &str = "archive";

/// One release in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Release {
    /// Prefixed version string, e.g. `go1.22.2`.
    pub version: String,
    /// Whether the release is production-ready.
    #[serde(default)]
    pub stable: bool,
    /// Downloadable files for this release, in catalog order.
    #[serde(default)]
    pub files: Vec<ReleaseFile>,
}

impl Release {
    /// Return the version with the `go` prefix removed.
    ///
    /// # Examples
    ///
    /// ```
    /// use gosetup::catalog::Release;
    ///
    /// let release = Release {
    ///     version: "go1.22.2".to_owned(),
    ///     stable: true,
    ///     files: Vec::new(),
    /// };
    /// assert_eq!(release.bare_version(), "1.22.2");
    /// ```
    #[must_use]
    pub fn bare_version(&self) -> &str {
        strip_version_prefix(&self.version)
    }

    /// Return the first archive built for `host`, if any.
    #[must_use]
    pub fn archive_for(&self, host: &HostPlatform) -> Option<&ReleaseFile> {
        self.files.iter().find(|file| file.is_archive_for(host))
    }
}

/// One downloadable file within a release.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleaseFile {
    /// File name relative to the download base, e.g.
    /// `go1.22.2.linux-amd64.tar.gz`.
    pub filename: String,
    /// Target operating system (`linux`, `darwin`, ...).
    pub os: String,
    /// Target architecture (`amd64`, `arm64`, ...).
    pub arch: String,
    /// Lowercase hex SHA-256 of the file (empty when unpublished).
    #[serde(default, rename = "sha256", alias = "checksum")]
    pub checksum: String,
    /// File size in bytes.
    #[serde(default)]
    pub size: u64,
    /// File kind: `archive`, `installer`, or `source`.
    pub kind: String,
}

impl ReleaseFile {
    /// Whether this file is an archive for the given host.
    #[must_use]
    pub fn is_archive_for(&self, host: &HostPlatform) -> bool {
        self.os == host.os && self.arch == host.arch && self.kind == ARCHIVE_KIND
    }
}

/// Remove the `go` prefix from a version string when present.
#[must_use]
pub fn strip_version_prefix(version: &str) -> &str {
    version.strip_prefix(VERSION_PREFIX).unwrap_or(version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn file(os: &str, arch: &str, kind: &str) -> ReleaseFile {
        ReleaseFile {
            filename: format!("go1.22.2.{os}-{arch}.tar.gz"),
            os: os.to_owned(),
            arch: arch.to_owned(),
            checksum: String::new(),
            size: 0,
            kind: kind.to_owned(),
        }
    }

    #[rstest]
    #[case::prefixed("go1.22.2", "1.22.2")]
    #[case::bare("1.22.2", "1.22.2")]
    #[case::release_candidate("go1.23rc1", "1.23rc1")]
    fn strips_prefix(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(strip_version_prefix(raw), expected);
    }

    #[test]
    fn archive_for_skips_installers_and_other_platforms() {
        let release = Release {
            version: "go1.22.2".to_owned(),
            stable: true,
            files: vec![
                file("linux", "amd64", "installer"),
                file("darwin", "amd64", "archive"),
                file("linux", "arm64", "archive"),
                file("linux", "amd64", "archive"),
            ],
        };
        let host = HostPlatform::new("linux", "amd64");
        let found = release.archive_for(&host).expect("archive present");
        assert_eq!(found.os, "linux");
        assert_eq!(found.arch, "amd64");
        assert_eq!(found.kind, ARCHIVE_KIND);
    }

    #[test]
    fn archive_for_returns_none_without_match() {
        let release = Release {
            version: "go1.22.2".to_owned(),
            stable: true,
            files: vec![file("windows", "amd64", "archive")],
        };
        assert!(
            release
                .archive_for(&HostPlatform::new("linux", "amd64"))
                .is_none()
        );
    }
}
