//! Shared test utilities for the installer crate.
//!
//! Stubs for the network-facing collaborators and builders for catalog
//! entries and `.tar.gz` fixtures. Compiled for unit tests and, through the
//! `test-support` feature, for the integration and behaviour tests.

use crate::catalog::{ARCHIVE_KIND, CatalogError, Release, ReleaseFile, ReleaseSource};
use crate::download::{DownloadError, Downloader};
use crate::platform::{PlatformDetector, PlatformError, SystemInfo, default_architecture};
use flate2::Compression;
use flate2::write::GzEncoder;
use sha2::{Digest, Sha256};
use std::cell::{Cell, RefCell};
use std::io;
use std::path::Path;
use tar::{EntryType, Header};

/// Creates an archive `ReleaseFile` named the way go.dev names them.
#[must_use]
pub fn archive_file(version: &str, os: &str, arch: &str) -> ReleaseFile {
    ReleaseFile {
        filename: format!("go{version}.{os}-{arch}.tar.gz"),
        os: os.to_owned(),
        arch: arch.to_owned(),
        checksum: String::new(),
        size: 0,
        kind: ARCHIVE_KIND.to_owned(),
    }
}

/// Creates a catalog `Release`; `version` is given without the `go` prefix.
#[must_use]
pub fn release(version: &str, stable: bool, files: Vec<ReleaseFile>) -> Release {
    Release {
        version: format!("go{version}"),
        stable,
        files,
    }
}

/// Returns the lowercase hex SHA-256 digest of `bytes`.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// A stub platform detector reporting a fixed machine architecture.
///
/// `None` simulates a host without uname support.
#[derive(Debug, Clone)]
pub struct StubDetector {
    /// The raw architecture to report, if detection succeeds.
    pub architecture: Option<String>,
}

impl StubDetector {
    /// A detector reporting `architecture` on a 6.8 kernel.
    #[must_use]
    pub fn reporting(architecture: &str) -> Self {
        Self {
            architecture: Some(architecture.to_owned()),
        }
    }

    /// A detector that always fails with the build default architecture.
    #[must_use]
    pub fn unsupported() -> Self {
        Self { architecture: None }
    }
}

impl PlatformDetector for StubDetector {
    fn detect(&self) -> Result<SystemInfo, PlatformError> {
        match &self.architecture {
            Some(architecture) => Ok(SystemInfo {
                kernel_version: "6.8.0-test".to_owned(),
                architecture: architecture.clone(),
            }),
            None => Err(PlatformError::Unsupported {
                os: "test",
                default_arch: default_architecture(),
            }),
        }
    }
}

/// A stub release source serving canned catalog and latest-version data.
///
/// `None` for either field makes the corresponding lookup fail with a
/// network error. Calls are counted so tests can assert which endpoints
/// were consulted.
#[derive(Debug, Default)]
pub struct StubReleaseSource {
    /// The catalog to serve.
    pub catalog: Option<Vec<Release>>,
    /// The latest version to serve, without the `go` prefix.
    pub latest: Option<String>,
    catalog_calls: Cell<usize>,
    latest_calls: Cell<usize>,
}

impl StubReleaseSource {
    /// Creates a source serving the given data.
    #[must_use]
    pub fn new(catalog: Option<Vec<Release>>, latest: Option<&str>) -> Self {
        Self {
            catalog,
            latest: latest.map(str::to_owned),
            ..Self::default()
        }
    }

    /// Number of catalog fetches so far.
    #[must_use]
    pub fn catalog_calls(&self) -> usize {
        self.catalog_calls.get()
    }

    /// Number of latest-version fetches so far.
    #[must_use]
    pub fn latest_calls(&self) -> usize {
        self.latest_calls.get()
    }
}

impl ReleaseSource for StubReleaseSource {
    fn fetch_catalog(&self) -> Result<Vec<Release>, CatalogError> {
        self.catalog_calls.set(self.catalog_calls.get() + 1);
        self.catalog.clone().ok_or_else(|| CatalogError::Network {
            url: "stub://catalog".to_owned(),
            reason: "catalog unavailable".to_owned(),
        })
    }

    fn fetch_latest_version(&self) -> Result<String, CatalogError> {
        self.latest_calls.set(self.latest_calls.get() + 1);
        self.latest.clone().ok_or_else(|| CatalogError::Network {
            url: "stub://latest".to_owned(),
            reason: "latest version unavailable".to_owned(),
        })
    }
}

/// A stub downloader writing a fixed payload and recording requested URLs.
#[derive(Debug, Default)]
pub struct StubDownloader {
    /// Bytes written to the destination on success.
    pub payload: Vec<u8>,
    /// When set, every download fails with this HTTP status.
    pub fail_status: Option<u16>,
    requested: RefCell<Vec<String>>,
}

impl StubDownloader {
    /// A downloader that serves `payload` for every URL.
    #[must_use]
    pub fn serving(payload: Vec<u8>) -> Self {
        Self {
            payload,
            ..Self::default()
        }
    }

    /// A downloader that answers every request with `status`.
    #[must_use]
    pub fn failing(status: u16) -> Self {
        Self {
            fail_status: Some(status),
            ..Self::default()
        }
    }

    /// URLs requested so far, in order.
    #[must_use]
    pub fn requested(&self) -> Vec<String> {
        self.requested.borrow().clone()
    }
}

impl Downloader for StubDownloader {
    fn download(&self, url: &str, dest: &Path) -> Result<u64, DownloadError> {
        self.requested.borrow_mut().push(url.to_owned());
        if let Some(status) = self.fail_status {
            return Err(DownloadError::HttpStatus {
                url: url.to_owned(),
                status,
            });
        }
        std::fs::write(dest, &self.payload)?;
        Ok(u64::try_from(self.payload.len()).unwrap_or(u64::MAX))
    }
}

/// One entry of a `.tar.gz` fixture.
#[derive(Debug, Clone, Copy)]
pub enum FixtureEntry<'a> {
    /// A directory with the given mode.
    Dir {
        /// Entry path inside the archive.
        path: &'a str,
        /// Permission bits.
        mode: u32,
    },
    /// A regular file.
    File {
        /// Entry path inside the archive.
        path: &'a str,
        /// Permission bits.
        mode: u32,
        /// File contents.
        contents: &'a [u8],
    },
    /// A symbolic link.
    Symlink {
        /// Entry path inside the archive.
        path: &'a str,
        /// Link target.
        target: &'a str,
    },
    /// A regular file whose name bytes are written without validation,
    /// allowing `..` and absolute names.
    Raw {
        /// Raw name bytes (at most 100).
        name: &'a [u8],
        /// File contents.
        contents: &'a [u8],
    },
}

/// Builds a gzip-compressed tarball from `entries`.
///
/// # Errors
///
/// Returns an I/O error if an entry cannot be encoded, including a raw
/// name longer than the 100-byte header field.
pub fn tar_gz(entries: &[FixtureEntry<'_>]) -> io::Result<Vec<u8>> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for entry in entries {
        append_entry(&mut builder, entry)?;
    }
    builder.into_inner()?.finish()
}

/// Writes a gzip-compressed tarball built from `entries` to `path`.
///
/// # Errors
///
/// Returns an I/O error if the fixture cannot be built or written.
pub fn write_tar_gz(path: &Path, entries: &[FixtureEntry<'_>]) -> io::Result<()> {
    std::fs::write(path, tar_gz(entries)?)
}

/// Builds a minimal Go distribution: `go/bin/go` and `go/VERSION`.
///
/// # Errors
///
/// Returns an I/O error if the fixture cannot be encoded.
pub fn go_distribution(version: &str) -> io::Result<Vec<u8>> {
    let version_file = format!("go{version}\n");
    tar_gz(&[
        FixtureEntry::Dir {
            path: "go/",
            mode: 0o755,
        },
        FixtureEntry::Dir {
            path: "go/bin/",
            mode: 0o755,
        },
        FixtureEntry::File {
            path: "go/bin/go",
            mode: 0o755,
            contents: b"#!/bin/sh\necho go\n",
        },
        FixtureEntry::File {
            path: "go/VERSION",
            mode: 0o644,
            contents: version_file.as_bytes(),
        },
    ])
}

fn append_entry<W: io::Write>(
    builder: &mut tar::Builder<W>,
    entry: &FixtureEntry<'_>,
) -> io::Result<()> {
    let mut header = Header::new_gnu();
    match *entry {
        FixtureEntry::Dir { path, mode } => {
            header.set_entry_type(EntryType::Directory);
            header.set_mode(mode);
            header.set_size(0);
            builder.append_data(&mut header, path, io::empty())
        }
        FixtureEntry::File {
            path,
            mode,
            contents,
        } => {
            header.set_entry_type(EntryType::Regular);
            header.set_mode(mode);
            header.set_size(contents.len() as u64);
            builder.append_data(&mut header, path, contents)
        }
        FixtureEntry::Symlink { path, target } => {
            header.set_entry_type(EntryType::Symlink);
            header.set_mode(0o777);
            header.set_size(0);
            header.set_link_name(target)?;
            builder.append_data(&mut header, path, io::empty())
        }
        FixtureEntry::Raw { name, contents } => {
            let field = header
                .as_gnu_mut()
                .map(|gnu| &mut gnu.name)
                .ok_or_else(|| io::Error::other("GNU header expected"))?;
            let slot = field
                .get_mut(..name.len())
                .ok_or_else(|| io::Error::other("raw entry name exceeds 100 bytes"))?;
            slot.copy_from_slice(name);
            header.set_entry_type(EntryType::Regular);
            header.set_mode(0o644);
            header.set_size(contents.len() as u64);
            header.set_cksum();
            builder.append(&header, contents)
        }
    }
}
