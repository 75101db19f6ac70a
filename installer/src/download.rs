//! Archive download.
//!
//! Provides a trait-based abstraction for streaming the resolved archive to
//! disk, enabling dependency injection for testing, plus the checks that
//! run before a download: the temporary directory must be usable and the
//! URL must name a file.

use crate::error::{InstallerError, Result};
use crate::http::{self, RequestFailure};
use crate::progress::{copy_with_progress, download_bar};
use indicatif::{ProgressBar, ProgressDrawTarget};
use log::debug;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

/// Progress redraws per second: at most one status line every 100 ms.
const PROGRESS_REFRESH_HZ: u8 = 10;

/// Name of the file written to probe the temporary directory.
const WRITE_PROBE: &str = "test_write";

/// Trait for downloading an archive to a local file.
///
/// # Examples
///
/// ```no_run
/// use gosetup::download::{Downloader, HttpDownloader};
/// use std::path::Path;
///
/// let bytes = HttpDownloader.download(
///     "https://go.dev/dl/go1.22.2.linux-amd64.tar.gz",
///     Path::new("/tmp/go1.22.2.linux-amd64.tar.gz"),
/// )?;
/// println!("{bytes} bytes");
/// # Ok::<(), gosetup::download::DownloadError>(())
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait Downloader {
    /// Download `url` into `dest`, returning the number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::Network`] if the request fails in transit,
    /// [`DownloadError::HttpStatus`] on a non-200 response, and
    /// [`DownloadError::Io`] if the file cannot be written.
    fn download(&self, url: &str, dest: &Path) -> std::result::Result<u64, DownloadError>;
}

/// Errors arising from archive downloads.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// The request failed before a response arrived.
    #[error("download failed for {url}: {reason}")]
    Network {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// The server answered with a status other than 200.
    #[error("download failed for {url}, status code: {status}")]
    HttpStatus {
        /// The URL that was requested.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// I/O error writing the downloaded file.
    #[error("I/O error writing download: {0}")]
    Io(#[from] io::Error),

    /// The progress bar template failed to parse.
    #[error("invalid progress bar template: {0}")]
    ProgressTemplate(#[from] indicatif::style::TemplateError),
}

/// HTTP downloader using `ureq`, drawing progress on standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpDownloader;

impl Downloader for HttpDownloader {
    fn download(&self, url: &str, dest: &Path) -> std::result::Result<u64, DownloadError> {
        let response = http::get(url).map_err(|failure| map_request_failure(url, failure))?;
        let total = response.body().content_length();
        debug!("Content length for {url}: {total:?}");

        let bar = download_bar(total, ProgressDrawTarget::stdout_with_hz(PROGRESS_REFRESH_HZ))?;
        let mut body = response.into_body();
        save_body(&mut body.as_reader(), dest, &bar)
    }
}

/// Stream `reader` into a new file at `dest`, removing it on failure.
fn save_body(
    reader: &mut dyn Read,
    dest: &Path,
    bar: &ProgressBar,
) -> std::result::Result<u64, DownloadError> {
    let file = File::create(dest)?;
    copy_with_progress(reader, file, bar).map_err(|err| {
        discard_partial(dest);
        DownloadError::from(err)
    })
}

fn discard_partial(dest: &Path) {
    if let Err(err) = fs::remove_file(dest) {
        debug!("Failed to remove partial download {}: {err}", dest.display());
    }
}

fn map_request_failure(url: &str, failure: RequestFailure) -> DownloadError {
    match failure {
        RequestFailure::Status(status) => DownloadError::HttpStatus {
            url: url.to_owned(),
            status,
        },
        RequestFailure::Transport(reason) => DownloadError::Network {
            url: url.to_owned(),
            reason,
        },
    }
}

/// Ensure `dir` exists and accepts new files.
///
/// A missing directory is created. Writability is probed by creating and
/// removing a small sentinel file.
///
/// # Errors
///
/// Returns [`InstallerError::TempDirUnavailable`] if the directory cannot
/// be inspected or created, and [`InstallerError::TempDirNotWritable`] if
/// the probe file cannot be written or removed.
pub fn prepare_download_dir(dir: &Path) -> Result<()> {
    match fs::metadata(dir) {
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!("Creating temporary directory {}", dir.display());
            fs::create_dir_all(dir).map_err(|source| InstallerError::TempDirUnavailable {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        Err(source) => {
            return Err(InstallerError::TempDirUnavailable {
                path: dir.to_path_buf(),
                source,
            });
        }
    }

    let probe = dir.join(WRITE_PROBE);
    fs::write(&probe, b"test")
        .and_then(|()| fs::remove_file(&probe))
        .map_err(|source| InstallerError::TempDirNotWritable {
            path: dir.to_path_buf(),
            source,
        })
}

/// Return the archive file name: the last `/`-separated segment of `url`.
///
/// # Examples
///
/// ```
/// use gosetup::download::archive_file_name;
///
/// assert_eq!(
///     archive_file_name("https://go.dev/dl/go1.22.2.linux-amd64.tar.gz"),
///     Some("go1.22.2.linux-amd64.tar.gz"),
/// );
/// assert_eq!(archive_file_name("https://go.dev/dl/"), None);
/// ```
#[must_use]
pub fn archive_file_name(url: &str) -> Option<&str> {
    let name = url.rsplit('/').next()?;
    (!name.is_empty() && name != "." && name != "..").then_some(name)
}

/// Like [`archive_file_name`], failing with an installer error.
///
/// # Errors
///
/// Returns [`InstallerError::InvalidDownloadUrl`] when `url` has no usable
/// file name.
pub fn require_archive_file_name(url: &str) -> Result<&str> {
    archive_file_name(url).ok_or_else(|| InstallerError::InvalidDownloadUrl {
        url: url.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::catalog("https://go.dev/dl/go1.22.2.linux-amd64.tar.gz", Some("go1.22.2.linux-amd64.tar.gz"))]
    #[case::bare("go1.21.0.darwin-arm64.tar.gz", Some("go1.21.0.darwin-arm64.tar.gz"))]
    #[case::trailing_slash("https://go.dev/dl/", None)]
    #[case::dot("https://go.dev/dl/.", None)]
    #[case::dot_dot("https://go.dev/dl/..", None)]
    #[case::empty("", None)]
    fn extracts_file_name(#[case] url: &str, #[case] expected: Option<&str>) {
        assert_eq!(archive_file_name(url), expected);
    }

    #[test]
    fn missing_file_name_is_fatal() {
        let err = require_archive_file_name("https://go.dev/dl/").expect_err("no name");
        assert!(matches!(err, InstallerError::InvalidDownloadUrl { .. }));
    }

    #[test]
    fn prepare_creates_missing_directory() {
        let temp = tempfile::tempdir().expect("temp dir");
        let dir = temp.path().join("nested").join("downloads");
        prepare_download_dir(&dir).expect("prepare");
        assert!(dir.is_dir());
        assert!(!dir.join(WRITE_PROBE).exists(), "probe must be removed");
    }

    #[test]
    fn prepare_accepts_existing_directory() {
        let temp = tempfile::tempdir().expect("temp dir");
        prepare_download_dir(temp.path()).expect("prepare");
        assert_eq!(fs::read_dir(temp.path()).expect("read dir").count(), 0);
    }

    #[test]
    fn prepare_rejects_a_regular_file() {
        let temp = tempfile::tempdir().expect("temp dir");
        let file = temp.path().join("not-a-dir");
        fs::write(&file, b"x").expect("write");
        let err = prepare_download_dir(&file).expect_err("file is not a directory");
        assert!(matches!(err, InstallerError::TempDirNotWritable { .. }));
    }

    #[test]
    fn prepare_rejects_a_path_below_a_file() {
        let temp = tempfile::tempdir().expect("temp dir");
        let file = temp.path().join("blocker");
        fs::write(&file, b"x").expect("write");
        let err = prepare_download_dir(&file.join("downloads")).expect_err("cannot create");
        assert!(matches!(err, InstallerError::TempDirUnavailable { .. }));
    }

    #[rstest]
    #[case::not_found(RequestFailure::Status(404), "status code: 404")]
    #[case::transport(RequestFailure::Transport("refused".to_owned()), "refused")]
    fn request_failures_keep_the_url(#[case] failure: RequestFailure, #[case] detail: &str) {
        let err = map_request_failure("https://go.dev/dl/go9.tar.gz", failure);
        let message = err.to_string();
        assert!(message.contains("https://go.dev/dl/go9.tar.gz"));
        assert!(message.contains(detail));
    }

    struct DroppedConnection;

    impl Read for DroppedConnection {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "connection reset"))
        }
    }

    #[test]
    fn interrupted_body_leaves_no_partial_archive() {
        let temp = tempfile::tempdir().expect("temp dir");
        let dest = temp.path().join("go1.22.2.linux-amd64.tar.gz");
        let bar = ProgressBar::hidden();

        let err = save_body(&mut DroppedConnection, &dest, &bar).expect_err("read fails");
        assert!(matches!(err, DownloadError::Io(_)));
        assert!(!dest.exists(), "partial archive must be removed");
    }

    #[test]
    fn complete_body_is_written() {
        let temp = tempfile::tempdir().expect("temp dir");
        let dest = temp.path().join("go1.22.2.linux-amd64.tar.gz");
        let bar = ProgressBar::hidden();

        let written = save_body(&mut &b"archive bytes"[..], &dest, &bar).expect("save");
        assert_eq!(written, 13);
        assert_eq!(fs::read(&dest).expect("read"), b"archive bytes");
    }

    #[test]
    fn unreachable_host_is_a_network_error() {
        let temp = tempfile::tempdir().expect("temp dir");
        let dest = temp.path().join("go.tar.gz");
        let err = HttpDownloader
            .download("http://127.0.0.1:9/go1.22.2.linux-amd64.tar.gz", &dest)
            .expect_err("nothing listens on the discard port");
        assert!(matches!(err, DownloadError::Network { .. }));
        assert!(!dest.exists(), "no file is created before a response");
    }
}
