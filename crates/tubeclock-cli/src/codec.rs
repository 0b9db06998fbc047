//! Line assembly for the serial link.
//!
//! The link delivers bytes in whatever chunks the UART driver hands over.
//! [`LineReader`] accumulates them until a newline is seen and yields the
//! line with surrounding whitespace removed (which also drops the `\r` of a
//! CRLF ending). Lines that are empty after trimming are skipped.
//!
//! Polling never blocks: each call to [`LineReader::poll_line`] yields at
//! most one ready line, matching a host loop that dispatches one command
//! per pass.

use bytes::{Buf, BytesMut};
use tracing::{trace, warn};

use crate::telemetry::metric_defs;

/// Maximum accepted line length in bytes (excluding the terminator).
pub const MAX_LINE_LENGTH: usize = 256;

/// Line terminator on the serial link.
pub const LINE_TERMINATOR: u8 = b'\n';

/// Terminator written after each response line.
pub const RESPONSE_TERMINATOR: &[u8] = b"\r\n";

/// Accumulates serial bytes into complete command lines.
#[derive(Debug, Default)]
pub struct LineReader {
    /// Bytes received since the last complete line.
    buffer: BytesMut,
    /// Set after an overflow; bytes are dropped until the next newline.
    discarding: bool,
    /// Number of overlong lines dropped so far.
    overflows: u64,
}

impl LineReader {
    /// Create an empty line reader.
    pub fn new() -> Self {
        LineReader {
            buffer: BytesMut::with_capacity(MAX_LINE_LENGTH),
            discarding: false,
            overflows: 0,
        }
    }

    /// Add received bytes to the buffer.
    pub fn push(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Pop the next complete, non-empty line.
    ///
    /// Returns `None` when no full line is buffered yet.
    pub fn poll_line(&mut self) -> Option<String> {
        loop {
            let Some(end) = self.buffer.iter().position(|&b| b == LINE_TERMINATOR) else {
                if content_len(&self.buffer) > MAX_LINE_LENGTH {
                    // No terminator in sight: drop what we have and keep
                    // dropping until the newline finally arrives.
                    self.buffer.clear();
                    if !self.discarding {
                        self.note_overflow();
                        self.discarding = true;
                    }
                }
                return None;
            };

            let raw = self.buffer.split_to(end);
            self.buffer.advance(1);

            if self.discarding {
                self.discarding = false;
                continue;
            }
            if content_len(&raw) > MAX_LINE_LENGTH {
                self.note_overflow();
                continue;
            }

            let text = String::from_utf8_lossy(&raw);
            let line = text.trim();
            if line.is_empty() {
                continue;
            }

            trace!("LineReader: complete line '{}' ({} bytes)", line, raw.len());
            return Some(line.to_string());
        }
    }

    /// Number of overlong lines dropped since creation.
    pub fn overflow_count(&self) -> u64 {
        self.overflows
    }

    /// Get the number of buffered bytes.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Clear the buffer.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.discarding = false;
    }

    fn note_overflow(&mut self) {
        self.overflows += 1;
        metrics::counter!(metric_defs::LINE_OVERFLOWS.name).increment(1);
        warn!(
            "LineReader: dropped line longer than {} bytes (total dropped: {})",
            MAX_LINE_LENGTH, self.overflows
        );
    }
}

/// Length of a line without the `\r` of a CRLF ending.
fn content_len(raw: &[u8]) -> usize {
    raw.strip_suffix(b"\r").map_or(raw.len(), <[u8]>::len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line() {
        let mut reader = LineReader::new();
        reader.push(b"help\n");

        assert_eq!(reader.poll_line(), Some("help".to_string()));
        assert!(reader.poll_line().is_none());
    }

    #[test]
    fn test_partial_line() {
        let mut reader = LineReader::new();
        reader.push(b"get wifi");

        assert!(reader.poll_line().is_none());

        reader.push(b"_ssid\n");
        assert_eq!(reader.poll_line(), Some("get wifi_ssid".to_string()));
    }

    #[test]
    fn test_crlf_and_whitespace_trimmed() {
        let mut reader = LineReader::new();
        reader.push(b"  set bl_intensity 7 \r\n");

        assert_eq!(reader.poll_line(), Some("set bl_intensity 7".to_string()));
    }

    #[test]
    fn test_empty_lines_skipped() {
        let mut reader = LineReader::new();
        reader.push(b"\n\r\n   \nreboot\n");

        assert_eq!(reader.poll_line(), Some("reboot".to_string()));
        assert!(reader.poll_line().is_none());
        assert_eq!(reader.buffered_len(), 0);
    }

    #[test]
    fn test_one_line_per_poll() {
        let mut reader = LineReader::new();
        reader.push(b"help\nget_config\n");

        assert_eq!(reader.poll_line(), Some("help".to_string()));
        assert_eq!(reader.poll_line(), Some("get_config".to_string()));
        assert!(reader.poll_line().is_none());
    }

    #[test]
    fn test_overflow_discards_until_newline() {
        let mut reader = LineReader::new();
        reader.push(&[b'x'; MAX_LINE_LENGTH + 10]);

        assert!(reader.poll_line().is_none());
        assert_eq!(reader.overflow_count(), 1);

        // Tail of the same overlong line, then a good one.
        reader.push(b"yyyy\nhelp\n");
        assert_eq!(reader.poll_line(), Some("help".to_string()));
        assert_eq!(reader.overflow_count(), 1);
    }

    #[test]
    fn test_overlong_complete_line_dropped() {
        let mut reader = LineReader::new();
        let mut data = vec![b'a'; MAX_LINE_LENGTH + 1];
        data.extend_from_slice(b"\nhelp\n");
        reader.push(&data);

        assert_eq!(reader.poll_line(), Some("help".to_string()));
        assert_eq!(reader.overflow_count(), 1);
    }

    #[test]
    fn test_max_length_line_accepted_with_either_ending() {
        let command = "a".repeat(MAX_LINE_LENGTH);
        let mut reader = LineReader::new();

        reader.push(format!("{}\r\n", command).as_bytes());
        assert_eq!(reader.poll_line(), Some(command.clone()));

        reader.push(format!("{}\n", command).as_bytes());
        assert_eq!(reader.poll_line(), Some(command.clone()));

        // CR arrives in one chunk, LF in the next.
        reader.push(format!("{}\r", command).as_bytes());
        assert!(reader.poll_line().is_none());
        reader.push(b"\n");
        assert_eq!(reader.poll_line(), Some(command));
        assert_eq!(reader.overflow_count(), 0);
    }
}
