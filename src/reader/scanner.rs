//! Line splitting and tag line recognition.
//!
//! Lines are handled as raw bytes: the header's encoding is only known
//! line by line, so nothing is decoded here.

use std::borrow::Cow;
use std::io::{BufRead, Read};

use crate::error::{ReadError, Result};

/// First character of every header line
pub const TAG_MARKER: u8 = b'#';

/// Longest line accepted, counting its terminator
pub const MAX_LINE_LENGTH: usize = 64 * 1024;

/// Whether `line` belongs to the header.
pub fn is_tag_line(line: &[u8]) -> bool {
    line.first() == Some(&TAG_MARKER)
}

/// Split a tag line into its name and raw value.
///
/// All leading markers are dropped, then the rest is split at the first
/// colon. Without a colon the name is empty and everything is the value.
pub fn split_tag_line(line: &[u8]) -> (Cow<'_, str>, &[u8]) {
    let start = line
        .iter()
        .position(|&b| b != TAG_MARKER)
        .unwrap_or(line.len());
    let rest = &line[start..];

    match rest.iter().position(|&b| b == b':') {
        Some(sep) => (String::from_utf8_lossy(&rest[..sep]), &rest[sep + 1..]),
        None => (Cow::Borrowed(""), rest),
    }
}

/// Reads `\n`-terminated lines, dropping the terminator and one trailing `\r`.
///
/// The final line needs no terminator; a trailing `\r` is dropped there too.
pub struct Lines<R> {
    inner: R,
    buf: Vec<u8>,
    line_number: usize,
}

impl<R: BufRead> Lines<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: Vec::new(),
            line_number: 0,
        }
    }

    /// 1-based number of the line last returned.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Next line, or `None` at the end of the input.
    pub fn next_line(&mut self) -> Result<Option<&[u8]>> {
        self.buf.clear();
        let line = self.line_number + 1;

        let read = self
            .inner
            .by_ref()
            .take(MAX_LINE_LENGTH as u64)
            .read_until(b'\n', &mut self.buf)
            .map_err(|source| ReadError::Io { line, source })?;
        if read == 0 {
            return Ok(None);
        }
        self.line_number = line;

        // A full buffer without a terminator leaves no room to see the end
        // of the input, so an unterminated line must be shorter than the limit
        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
        } else if read == MAX_LINE_LENGTH {
            return Err(ReadError::LineTooLong {
                line,
                limit: MAX_LINE_LENGTH,
            });
        }
        if self.buf.last() == Some(&b'\r') {
            self.buf.pop();
        }

        Ok(Some(self.buf.as_slice()))
    }
}
