//! User-facing output for the installer CLI.
//!
//! Status lines go to standard output; warnings and errors go to the error
//! stream with a `Warning:` or `Error:` prefix. Writers are injected so the
//! pipeline can be tested against in-memory buffers.

use std::fmt::Display;
use std::io::Write;

/// Writes status, warning, and error lines.
pub struct Reporter<'a> {
    out: &'a mut dyn Write,
    err: &'a mut dyn Write,
}

impl<'a> Reporter<'a> {
    /// Create a reporter over the given output and error streams.
    pub fn new(out: &'a mut dyn Write, err: &'a mut dyn Write) -> Self {
        Self { out, err }
    }

    /// Write a status line.
    pub fn line(&mut self, message: impl Display) {
        write_line(self.out, message);
    }

    /// Write a `Warning:` line to the error stream.
    pub fn warn(&mut self, message: impl Display) {
        write_line(self.err, format_args!("Warning: {message}"));
    }

    /// Write an `Error:` line to the error stream.
    pub fn error(&mut self, message: impl Display) {
        write_line(self.err, format_args!("Error: {message}"));
    }
}

/// Write one line, ignoring write failures.
pub fn write_line(stream: &mut dyn Write, message: impl Display) {
    if writeln!(stream, "{message}").is_err() {
        // Best-effort output; ignore write failures.
    }
}

/// Format the final summary after a successful installation.
#[must_use]
pub fn completion_message(version: &str) -> String {
    format!("\nGo environment installation complete\nInstalled version: {version}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warnings_and_errors_go_to_error_stream() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        {
            let mut reporter = Reporter::new(&mut out, &mut err);
            reporter.line("Downloading installation package...");
            reporter.warn("could not find version");
            reporter.error("download failed");
        }
        let out = String::from_utf8(out).expect("utf8");
        let err = String::from_utf8(err).expect("utf8");
        assert_eq!(out, "Downloading installation package...\n");
        assert_eq!(
            err,
            "Warning: could not find version\nError: download failed\n"
        );
    }

    #[test]
    fn completion_message_names_version() {
        let message = completion_message("1.22.2");
        assert!(message.contains("Installed version: 1.22.2"));
    }
}
