//! Download progress reporting.
//!
//! Progress is drawn with `indicatif`. The bar is text-only: a known length
//! shows percentage, sizes, average speed and elapsed time, an unknown
//! length shows the transferred byte count. Byte sizes use
//! [`format_bytes`] rather than indicatif's built-in formatter so that the
//! line reads `1.0 KiB`, not `1.00 KiB`.

use indicatif::style::TemplateError;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle};
use std::fmt;
use std::io::{self, Read, Write};
use std::time::Duration;

const KNOWN_LENGTH_TEMPLATE: &str =
    "Downloading: {pct}% ({done} / {size}) Speed: {rate}/s Elapsed: {took}";
const UNKNOWN_LENGTH_TEMPLATE: &str = "Downloaded: {done}";

/// Printed once when the server does not announce a content length.
pub const UNKNOWN_LENGTH_WARNING: &str = "Warning: Cannot get content length for progress bar";

/// Build the progress style for a download of known or unknown length.
///
/// # Errors
///
/// Returns a [`TemplateError`] if the template fails to parse.
pub fn download_style(length_known: bool) -> Result<ProgressStyle, TemplateError> {
    let template = if length_known {
        KNOWN_LENGTH_TEMPLATE
    } else {
        UNKNOWN_LENGTH_TEMPLATE
    };
    Ok(ProgressStyle::with_template(template)?
        .with_key("pct", |state: &ProgressState, w: &mut dyn fmt::Write| {
            write_field(w, format_args!("{:.2}", percentage(state.pos(), state.len())));
        })
        .with_key("done", |state: &ProgressState, w: &mut dyn fmt::Write| {
            write_field(w, format_bytes(state.pos()));
        })
        .with_key("size", |state: &ProgressState, w: &mut dyn fmt::Write| {
            write_field(w, format_bytes(state.len().unwrap_or_default()));
        })
        .with_key("rate", |state: &ProgressState, w: &mut dyn fmt::Write| {
            write_field(w, format_bytes(average_speed(state.pos(), state.elapsed())));
        })
        .with_key("took", |state: &ProgressState, w: &mut dyn fmt::Write| {
            write_field(w, format_elapsed(state.elapsed()));
        }))
}

/// Create a download bar drawing to `target`.
///
/// A missing or zero `total` is treated as unknown and announced with
/// [`UNKNOWN_LENGTH_WARNING`].
///
/// # Errors
///
/// Returns a [`TemplateError`] if the bar style cannot be built.
pub fn download_bar(
    total: Option<u64>,
    target: ProgressDrawTarget,
) -> Result<ProgressBar, TemplateError> {
    let total = total.filter(|&bytes| bytes > 0);
    let bar = ProgressBar::with_draw_target(total, target)
        .with_style(download_style(total.is_some())?);
    if total.is_none() {
        bar.println(UNKNOWN_LENGTH_WARNING);
    }
    Ok(bar)
}

/// Copy `reader` into `writer`, advancing `bar` by every byte written.
///
/// The bar is finished on success, which redraws it with the final byte
/// count, and abandoned on failure.
///
/// # Errors
///
/// Returns any read, write, or flush error.
pub fn copy_with_progress<R, W>(reader: &mut R, writer: W, bar: &ProgressBar) -> io::Result<u64>
where
    R: Read + ?Sized,
    W: Write,
{
    let mut tee = bar.wrap_write(writer);
    match io::copy(reader, &mut tee).and_then(|copied| tee.flush().map(|()| copied)) {
        Ok(copied) => {
            bar.finish();
            Ok(copied)
        }
        Err(err) => {
            bar.abandon();
            Err(err)
        }
    }
}

/// Percentage of `len` covered by `pos`; zero when the length is unknown.
#[must_use]
#[expect(clippy::cast_precision_loss, reason = "percentages are display-only")]
pub fn percentage(pos: u64, len: Option<u64>) -> f64 {
    match len.filter(|&bytes| bytes > 0) {
        Some(len) => pos as f64 / len as f64 * 100.0,
        None => 0.0,
    }
}

/// Average bytes per second since the start of the transfer.
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    reason = "speed is display-only and never negative"
)]
pub fn average_speed(transferred: u64, elapsed: Duration) -> u64 {
    let seconds = elapsed.as_secs_f64();
    if seconds <= 0.0 {
        return 0;
    }
    (transferred as f64 / seconds) as u64
}

/// Format a byte count using 1024-based units with one decimal.
///
/// # Examples
///
/// ```
/// use gosetup::progress::format_bytes;
///
/// assert_eq!(format_bytes(1023), "1023 B");
/// assert_eq!(format_bytes(1024), "1.0 KiB");
/// assert_eq!(format_bytes(1_048_576), "1.0 MiB");
/// ```
#[must_use]
#[expect(clippy::cast_precision_loss, reason = "sizes are display-only")]
pub fn format_bytes(bytes: u64) -> String {
    const UNIT: u64 = 1024;
    const PREFIXES: [char; 6] = ['K', 'M', 'G', 'T', 'P', 'E'];
    if bytes < UNIT {
        return format!("{bytes} B");
    }
    let mut divisor = UNIT;
    let mut exponent = 0;
    let mut remaining = bytes / UNIT;
    while remaining >= UNIT {
        divisor *= UNIT;
        exponent += 1;
        remaining /= UNIT;
    }
    format!(
        "{:.1} {}iB",
        bytes as f64 / divisor as f64,
        PREFIXES[exponent]
    )
}

/// Format elapsed time truncated to whole seconds, e.g. `1h2m3s` or `45s`.
#[must_use]
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{hours}h{minutes}m{seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m{seconds}s")
    } else {
        format!("{seconds}s")
    }
}

/// Write one template field, ignoring formatter failures.
fn write_field(w: &mut dyn fmt::Write, value: impl fmt::Display) {
    if write!(w, "{value}").is_err() {
        // Best-effort rendering; a failed field leaves a gap in the line.
    }
}

#[cfg(test)]
#[path = "progress_tests.rs"]
mod tests;
