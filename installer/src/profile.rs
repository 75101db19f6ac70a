//! Shell profile PATH configuration.
//!
//! Adding Go's `bin` directory to `PATH` means appending one `export` line
//! to a shell profile. Profiles are tried as an ordered chain of rungs: in
//! effective root mode the system-wide `/etc/profile.d/go.sh` comes first,
//! followed by the user's `~/.profile`. A rung that fails is reported as a
//! warning and the next rung is tried. When every rung fails the user is
//! shown manual instructions; PATH configuration never aborts the install.

use crate::output::Reporter;
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};

/// Directory holding system-wide login shell snippets.
pub const SYSTEM_PROFILE_DIR: &str = "/etc/profile.d";

/// File name of the system-wide snippet.
pub const SYSTEM_PROFILE_FILE: &str = "go.sh";

/// Per-user login shell profile, relative to the home directory.
pub const USER_PROFILE_FILE: &str = ".profile";

/// Build the line that prepends `bin_dir` to `PATH`.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use gosetup::profile::export_line;
///
/// assert_eq!(
///     export_line(Utf8Path::new("/home/gopher/.local/go/bin")),
///     "export PATH=\"/home/gopher/.local/go/bin:$PATH\"",
/// );
/// ```
#[must_use]
pub fn export_line(bin_dir: &Utf8Path) -> String {
    format!("export PATH=\"{bin_dir}:$PATH\"")
}

/// What [`append_path_export`] did to a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileUpdate {
    /// The profile did not exist and was created with the export line.
    Created,
    /// The export line was appended to an existing profile.
    Appended,
    /// The profile already mentions the bin directory; nothing was written.
    AlreadyPresent,
}

/// Errors arising while editing a profile.
///
/// None of these abort the installation.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    /// The directory a profile must live in does not exist.
    #[error("directory {path} does not exist")]
    MissingDirectory {
        /// The missing directory.
        path: Utf8PathBuf,
    },

    /// The profile or its directory could not be inspected.
    #[error("failed to check {path}: {source}")]
    Inspect {
        /// The path being inspected.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A missing profile could not be created.
    #[error("failed to create {path}: {source}")]
    Create {
        /// The profile path.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// An existing profile could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// The profile path.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// An existing profile could not be opened for appending.
    #[error("failed to open {path} for appending: {source}")]
    OpenAppend {
        /// The profile path.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The export line could not be written.
    #[error("failed to write to {path}: {source}")]
    Write {
        /// The profile path.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Ensure `profile` exports `bin_dir` on `PATH`.
///
/// A missing profile is created containing only the export line. An
/// existing profile that mentions `bin_dir` anywhere is left untouched;
/// otherwise the export line is appended on a new line.
///
/// # Errors
///
/// Returns a [`ProfileError`] naming the step that failed.
pub fn append_path_export(
    profile: &Utf8Path,
    bin_dir: &Utf8Path,
) -> Result<ProfileUpdate, ProfileError> {
    let line = export_line(bin_dir);
    match fs::metadata(profile) {
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!("{profile} not found, creating it");
            let mut file = fs::File::create(profile).map_err(|source| ProfileError::Create {
                path: profile.to_owned(),
                source,
            })?;
            writeln!(file, "{line}").map_err(|source| ProfileError::Write {
                path: profile.to_owned(),
                source,
            })?;
            return Ok(ProfileUpdate::Created);
        }
        Err(source) => {
            return Err(ProfileError::Inspect {
                path: profile.to_owned(),
                source,
            });
        }
        Ok(_) => {}
    }

    let contents = fs::read(profile).map_err(|source| ProfileError::Read {
        path: profile.to_owned(),
        source,
    })?;
    if contains_bytes(&contents, bin_dir.as_str().as_bytes()) {
        debug!("{profile} already contains {bin_dir}");
        return Ok(ProfileUpdate::AlreadyPresent);
    }

    let mut file = OpenOptions::new()
        .append(true)
        .open(profile)
        .map_err(|source| ProfileError::OpenAppend {
            path: profile.to_owned(),
            source,
        })?;
    write!(file, "\n{line}\n").map_err(|source| ProfileError::Write {
        path: profile.to_owned(),
        source,
    })?;
    Ok(ProfileUpdate::Appended)
}

/// Byte-wise substring search; profiles need not be valid UTF-8.
fn contains_bytes(haystack: &[u8], needle: &[u8]) -> bool {
    needle.is_empty() || haystack.windows(needle.len()).any(|window| window == needle)
}

/// Whose environment a profile configures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileScope {
    /// Every user's login shell.
    SystemWide,
    /// The invoking user's login shell.
    User,
}

impl fmt::Display for ProfileScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SystemWide => write!(f, "system-wide"),
            Self::User => write!(f, "user"),
        }
    }
}

/// One profile in the fallback chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileRung {
    /// Whose environment the profile configures.
    pub scope: ProfileScope,
    /// The profile file.
    pub profile: Utf8PathBuf,
    /// A directory that must already exist for this rung to be usable.
    pub required_dir: Option<Utf8PathBuf>,
}

impl ProfileRung {
    /// The user rung: `<home>/.profile`.
    #[must_use]
    pub fn user(home: &Utf8Path) -> Self {
        Self {
            scope: ProfileScope::User,
            profile: home.join(USER_PROFILE_FILE),
            required_dir: None,
        }
    }

    /// The system rung: `/etc/profile.d/go.sh`.
    #[must_use]
    pub fn system_wide() -> Self {
        Self::system_wide_in(Utf8Path::new(SYSTEM_PROFILE_DIR))
    }

    /// A system rung rooted at `dir` instead of `/etc/profile.d`.
    #[must_use]
    pub fn system_wide_in(dir: &Utf8Path) -> Self {
        Self {
            scope: ProfileScope::SystemWide,
            profile: dir.join(SYSTEM_PROFILE_FILE),
            required_dir: Some(dir.to_owned()),
        }
    }

    /// Add `bin_dir` to this rung's profile.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::MissingDirectory`] if the required directory
    /// is absent, or any error from [`append_path_export`].
    pub fn apply(&self, bin_dir: &Utf8Path) -> Result<ProfileUpdate, ProfileError> {
        if let Some(dir) = &self.required_dir {
            match fs::metadata(dir) {
                Ok(_) => {}
                Err(err) if err.kind() == io::ErrorKind::NotFound => {
                    return Err(ProfileError::MissingDirectory { path: dir.clone() });
                }
                Err(source) => {
                    return Err(ProfileError::Inspect {
                        path: dir.clone(),
                        source,
                    });
                }
            }
        }
        append_path_export(&self.profile, bin_dir)
    }
}

/// Outcome of PATH configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathConfiguration {
    /// A profile now exports the bin directory.
    Configured {
        /// Which rung succeeded.
        scope: ProfileScope,
        /// The profile that was used.
        profile: Utf8PathBuf,
        /// What was done to it.
        update: ProfileUpdate,
    },
    /// Every rung failed; the user must edit PATH manually.
    Manual,
}

/// The rungs to try, in order.
#[must_use]
pub fn profile_chain(system_wide: bool, home: &Utf8Path) -> Vec<ProfileRung> {
    let mut chain = Vec::with_capacity(2);
    if system_wide {
        chain.push(ProfileRung::system_wide());
    }
    chain.push(ProfileRung::user(home));
    chain
}

/// Walk `chain` until a rung succeeds, reporting progress and fallbacks.
pub fn configure_path(
    chain: &[ProfileRung],
    bin_dir: &Utf8Path,
    reporter: &mut Reporter<'_>,
) -> PathConfiguration {
    let line = export_line(bin_dir);
    let mut rungs = chain.iter().peekable();
    while let Some(rung) = rungs.next() {
        announce(rung, reporter);
        match rung.apply(bin_dir) {
            Ok(update) => {
                report_update(update, &rung.profile, &line, reporter);
                reporter.line(activation_instructions(rung.scope, &rung.profile));
                return PathConfiguration::Configured {
                    scope: rung.scope,
                    profile: rung.profile.clone(),
                    update,
                };
            }
            Err(err) => {
                reporter.warn(&err);
                match rungs.peek() {
                    Some(next) if next.scope == ProfileScope::User => {
                        reporter.line("Falling back to user configuration...");
                    }
                    Some(_) => {}
                    None => reporter.line("Please manually add Go's bin directory to your PATH"),
                }
            }
        }
    }
    reporter.line(manual_instructions(bin_dir));
    PathConfiguration::Manual
}

fn announce(rung: &ProfileRung, reporter: &mut Reporter<'_>) {
    match rung.scope {
        ProfileScope::SystemWide => reporter.line("Attempting to configure PATH globally..."),
        ProfileScope::User => reporter.line(format_args!(
            "Attempting to add Go's bin directory to {}...",
            rung.profile
        )),
    }
}

fn report_update(update: ProfileUpdate, profile: &Utf8Path, line: &str, reporter: &mut Reporter<'_>) {
    match update {
        ProfileUpdate::Created => reporter.line(format_args!("Added '{line}' to {profile}.")),
        ProfileUpdate::Appended => reporter.line(format_args!("Appended '{line}' to {profile}.")),
        ProfileUpdate::AlreadyPresent => reporter.line(format_args!(
            "{profile} already contains Go bin directory in PATH. Skipping modification."
        )),
    }
}

/// How to activate a freshly configured profile.
#[must_use]
pub fn activation_instructions(scope: ProfileScope, profile: &Utf8Path) -> String {
    match scope {
        ProfileScope::SystemWide => format!(
            "\nTo activate the global changes, please either:\n\
             1. Log out and log back in (for all users)\n\
             2. Run: source {profile}\n\
             \nAfter that, you can open a new terminal or run 'go version' to verify the installation"
        ),
        ProfileScope::User => format!(
            "\nTo activate the changes for your user, please either:\n\
             1. Log out and log back in\n\
             2. Run: source {profile}\n\
             \nAfter that, you can run 'go version' to verify the installation"
        ),
    }
}

/// How to add `bin_dir` to `PATH` by hand.
#[must_use]
pub fn manual_instructions(bin_dir: &Utf8Path) -> String {
    format!(
        "\nManual step required:\n\
         Please add Go's bin directory to your PATH environment variable\n\
         You can add the following line to your shell configuration file \
         (e.g., ~/.bashrc, ~/.zshrc, ~/.profile):\n\
         \n{}\n\n\
         After adding the line, please run the following command to apply the changes:\n\
         source ~/.bashrc  (or your shell configuration file)",
        export_line(bin_dir)
    )
}

#[cfg(test)]
#[path = "profile_tests.rs"]
mod tests;
