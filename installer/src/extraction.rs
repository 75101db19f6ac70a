//! Archive extraction for Go distribution tarballs.
//!
//! Extracts `.tar.gz` archives into a destination directory. Every entry
//! path is joined onto the destination and lexically cleaned; an entry
//! whose cleaned target is not strictly inside the destination aborts the
//! extraction with [`ExtractionError::PathTraversal`].

use flate2::read::GzDecoder;
use log::debug;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Component, Path, PathBuf};
use tar::EntryType;

/// Trait for extracting downloaded archives, enabling test mocking.
///
/// # Examples
///
/// ```no_run
/// use gosetup::extraction::{ArchiveExtractor, TarGzExtractor};
/// use std::path::Path;
///
/// let files = TarGzExtractor.extract(
///     Path::new("/tmp/go1.22.2.linux-amd64.tar.gz"),
///     Path::new("/home/gopher/.local"),
/// )?;
/// println!("{files} files extracted");
/// # Ok::<(), gosetup::extraction::ExtractionError>(())
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait ArchiveExtractor {
    /// Extract the archive at `archive_path` into `dest_dir`.
    ///
    /// Returns the number of regular files written.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::PathTraversal`] if any entry
    /// attempts to escape the destination directory, and
    /// [`ExtractionError::Io`] on decompression or filesystem failures.
    fn extract(&self, archive_path: &Path, dest_dir: &Path) -> Result<usize, ExtractionError>;
}

/// Errors arising from archive extraction.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// I/O error during extraction.
    #[error("extraction I/O error: {0}")]
    Io(#[from] io::Error),

    /// A path in the archive resolves outside the destination.
    #[error("illegal file path: {path}")]
    PathTraversal {
        /// The offending path from the archive entry.
        path: String,
    },
}

/// Default extractor using the `flate2` and `tar` crates.
///
/// Directories and regular files are materialized with the mode recorded
/// in the archive. Symbolic links, hard links, and special files are
/// skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct TarGzExtractor;

impl ArchiveExtractor for TarGzExtractor {
    fn extract(&self, archive_path: &Path, dest_dir: &Path) -> Result<usize, ExtractionError> {
        let file = File::open(archive_path)?;
        let mut archive = tar::Archive::new(GzDecoder::new(file));
        let dest = lexical_clean(dest_dir);
        let mut written = 0;

        for entry_result in archive.entries()? {
            let mut entry = entry_result?;
            let entry_path = entry.path()?.into_owned();
            let target = contained_target(&dest, &entry_path)?;
            let mode = entry.header().mode()? & 0o7777;

            match entry.header().entry_type() {
                EntryType::Directory => create_directory(&target, mode)?,
                EntryType::Regular => {
                    write_file(&mut entry, &target, mode)?;
                    written += 1;
                }
                other => debug!(
                    "Skipping {} entry {}",
                    entry_kind(other),
                    entry_path.display()
                ),
            }
        }

        debug!("Extracted {written} files into {}", dest.display());
        Ok(written)
    }
}

/// Join `entry` onto `dest` and require the result to lie strictly inside it.
fn contained_target(dest: &Path, entry: &Path) -> Result<PathBuf, ExtractionError> {
    let target = lexical_join(dest, entry);
    if target == dest || !target.starts_with(dest) {
        return Err(ExtractionError::PathTraversal {
            path: target.display().to_string(),
        });
    }
    Ok(target)
}

/// Append `relative` to `base`, resolving `.` and `..` without touching the
/// filesystem. Root and prefix components of `relative` are ignored.
fn lexical_join(base: &Path, relative: &Path) -> PathBuf {
    let mut joined = base.to_path_buf();
    for component in relative.components() {
        match component {
            Component::Normal(part) => joined.push(part),
            Component::ParentDir => {
                joined.pop();
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }
    joined
}

/// Resolve `.` and `..` in `path` lexically.
fn lexical_clean(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::ParentDir => {
                if !cleaned.pop() {
                    cleaned.push(component);
                }
            }
            Component::CurDir => {}
            other => cleaned.push(other),
        }
    }
    cleaned
}

fn create_directory(target: &Path, mode: u32) -> io::Result<()> {
    if target.is_dir() {
        debug!(
            "Directory {} already exists, setting mode to {mode:o}",
            target.display()
        );
    } else {
        fs::create_dir_all(target)?;
    }
    apply_mode(target, mode)
}

fn write_file(entry: &mut impl io::Read, target: &Path, mode: u32) -> io::Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode);
    }
    let mut file = options.open(target)?;
    io::copy(entry, &mut file)?;
    apply_mode(target, mode)
}

#[cfg(unix)]
fn apply_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn apply_mode(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}

fn entry_kind(entry_type: EntryType) -> &'static str {
    match entry_type {
        EntryType::Symlink => "symlink",
        EntryType::Link => "hard link",
        EntryType::Char | EntryType::Block => "device",
        EntryType::Fifo => "fifo",
        _ => "unsupported",
    }
}
