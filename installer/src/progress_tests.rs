//! Unit tests for download progress reporting.

use super::*;
use indicatif::TermLike;
use rstest::rstest;
use std::sync::{Arc, Mutex};

/// Terminal stand-in recording everything indicatif draws.
#[derive(Debug, Clone, Default)]
struct Screen(Arc<Mutex<Vec<String>>>);

impl Screen {
    fn target(&self) -> ProgressDrawTarget {
        ProgressDrawTarget::term_like(Box::new(self.clone()))
    }

    fn text(&self) -> String {
        self.0.lock().expect("screen lock").concat()
    }

    fn record(&self, text: &str) -> io::Result<()> {
        self.0
            .lock()
            .map_err(|_| io::Error::other("screen lock poisoned"))?
            .push(text.to_owned());
        Ok(())
    }
}

impl TermLike for Screen {
    fn width(&self) -> u16 {
        160
    }

    fn move_cursor_up(&self, _n: usize) -> io::Result<()> {
        Ok(())
    }

    fn move_cursor_down(&self, _n: usize) -> io::Result<()> {
        Ok(())
    }

    fn move_cursor_right(&self, _n: usize) -> io::Result<()> {
        Ok(())
    }

    fn move_cursor_left(&self, _n: usize) -> io::Result<()> {
        Ok(())
    }

    fn write_line(&self, s: &str) -> io::Result<()> {
        self.record(&format!("{s}\n"))
    }

    fn write_str(&self, s: &str) -> io::Result<()> {
        self.record(s)
    }

    fn clear_line(&self) -> io::Result<()> {
        Ok(())
    }

    fn flush(&self) -> io::Result<()> {
        Ok(())
    }
}

/// A reader that yields its chunks one `read` call at a time.
struct Chunks(Vec<&'static [u8]>);

impl Read for Chunks {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.0.is_empty() {
            return Ok(0);
        }
        let chunk = self.0.remove(0);
        buf[..chunk.len()].copy_from_slice(chunk);
        Ok(chunk.len())
    }
}

struct FailingReader;

impl Read for FailingReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::other("connection reset"))
    }
}

#[rstest]
#[case::zero(0, "0 B")]
#[case::below_unit(1023, "1023 B")]
#[case::kibibyte(1024, "1.0 KiB")]
#[case::fractional(1536, "1.5 KiB")]
#[case::mebibyte(1_048_576, "1.0 MiB")]
#[case::gibibyte(1 << 30, "1.0 GiB")]
#[case::exbibyte(1 << 60, "1.0 EiB")]
#[case::max(u64::MAX, "16.0 EiB")]
fn formats_bytes(#[case] bytes: u64, #[case] expected: &str) {
    assert_eq!(format_bytes(bytes), expected);
}

#[rstest]
#[case::zero(Duration::ZERO, "0s")]
#[case::truncated(Duration::from_millis(1999), "1s")]
#[case::minutes(Duration::from_secs(65), "1m5s")]
#[case::hours(Duration::from_secs(3723), "1h2m3s")]
#[case::whole_hour(Duration::from_secs(3600), "1h0m0s")]
fn formats_elapsed(#[case] elapsed: Duration, #[case] expected: &str) {
    assert_eq!(format_elapsed(elapsed), expected);
}

#[test]
fn speed_is_zero_before_time_passes() {
    assert_eq!(average_speed(4096, Duration::ZERO), 0);
    assert_eq!(average_speed(4096, Duration::from_secs(2)), 2048);
}

#[rstest]
#[case::half(512, Some(1024), "50.00")]
#[case::third(1, Some(3), "33.33")]
#[case::complete(7, Some(7), "100.00")]
#[case::unknown(10, None, "0.00")]
#[case::zero_length(10, Some(0), "0.00")]
fn percentage_has_two_decimals(#[case] pos: u64, #[case] len: Option<u64>, #[case] expected: &str) {
    assert_eq!(format!("{:.2}", percentage(pos, len)), expected);
}

#[rstest]
#[case::known(true)]
#[case::unknown(false)]
fn styles_parse(#[case] length_known: bool) {
    assert!(download_style(length_known).is_ok());
}

#[test]
fn copy_tees_bytes_and_draws_the_final_total() {
    let screen = Screen::default();
    let bar = download_bar(Some(5), screen.target()).expect("bar");
    let mut sink = Vec::new();

    let copied = copy_with_progress(&mut Chunks(vec![b"he", b"llo"]), &mut sink, &bar)
        .expect("copy");

    assert_eq!(copied, 5);
    assert_eq!(sink, b"hello");
    assert_eq!(bar.position(), 5);
    assert!(bar.is_finished());
    let text = screen.text();
    assert!(
        text.contains("Downloading: 100.00% (5 B / 5 B) Speed: "),
        "final line missing from {text:?}"
    );
    assert!(!text.contains(UNKNOWN_LENGTH_WARNING));
}

#[test]
fn unknown_length_warns_and_ends_on_the_final_count() {
    let screen = Screen::default();
    let bar = download_bar(None, screen.target()).expect("bar");
    let mut sink = Vec::new();

    copy_with_progress(&mut Chunks(vec![b"abc", b"defgh"]), &mut sink, &bar).expect("copy");

    let text = screen.text();
    assert!(text.contains(UNKNOWN_LENGTH_WARNING), "warning missing from {text:?}");
    let last = text.rsplit("Downloaded: ").next().unwrap_or_default();
    assert!(last.starts_with("8 B"), "stale final line in {text:?}");
}

#[test]
fn zero_length_is_treated_as_unknown() {
    let bar = download_bar(Some(0), ProgressDrawTarget::hidden()).expect("bar");
    assert_eq!(bar.length(), None);
}

#[test]
fn failed_copy_abandons_the_bar() {
    let bar = download_bar(Some(10), ProgressDrawTarget::hidden()).expect("bar");
    let err = copy_with_progress(&mut FailingReader, Vec::new(), &bar).expect_err("read fails");
    assert_eq!(err.to_string(), "connection reset");
    assert!(bar.is_finished());
    assert_eq!(bar.position(), 0);
}
