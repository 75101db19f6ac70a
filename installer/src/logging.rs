//! Debug output wiring for the `log` facade.
//!
//! Records are rendered as `<Level>: <message>` on standard output so that
//! `--debug` traces interleave with the installer's status lines.

use env_logger::{Builder, Target};
use log::{Level, LevelFilter};
use std::io::Write;

/// Install the process-wide logger.
///
/// Debug mode enables `debug` records; otherwise only warnings and errors
/// are shown. Calling this more than once keeps the first logger.
pub fn init_logging(debug: bool) {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let installed = Builder::new()
        .filter_level(level)
        .target(Target::Stdout)
        .format(|buf, record| writeln!(buf, "{}: {}", level_label(record.level()), record.args()))
        .try_init();
    if installed.is_err() {
        log::debug!("Logger already initialised");
    }
}

/// The prefix printed before a record of the given level.
#[must_use]
pub fn level_label(level: Level) -> &'static str {
    match level {
        Level::Error => "Error",
        Level::Warn => "Warning",
        Level::Info => "Info",
        Level::Debug => "Debug",
        Level::Trace => "Trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::debug(Level::Debug, "Debug")]
    #[case::warn(Level::Warn, "Warning")]
    #[case::error(Level::Error, "Error")]
    fn labels_match_status_line_prefixes(#[case] level: Level, #[case] expected: &str) {
        assert_eq!(level_label(level), expected);
    }

    #[test]
    fn repeated_initialisation_is_harmless() {
        init_logging(true);
        init_logging(false);
        assert!(log::log_enabled!(Level::Warn));
    }
}
