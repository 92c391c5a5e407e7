//! Test utilities and fixtures for usdx-reader tests.
//!
//! Song files are built as raw bytes so tests can mix encodings and line
//! endings freely.
//!
//! # Example
//!
//! ```ignore
//! use crate::test_utils::{SongFile, read_bytes};
//!
//! let file = SongFile::new().tag("TITLE", "Song").line("E");
//! let outcome = read_bytes(file.bytes());
//! assert_eq!(outcome.song.title, "Song");
//! ```

use std::io::Cursor;
use std::path::PathBuf;

use tempfile::TempDir;

use crate::reader::{ReadOutcome, Reader, UTF8_BOM};

/// Builder for the bytes of a song file.
///
/// Every line is terminated with `\n`.
#[derive(Debug, Clone, Default)]
pub struct SongFile {
    bytes: Vec<u8>,
}

impl SongFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a UTF-8 byte order mark in front of everything written so far.
    pub fn with_bom(mut self) -> Self {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.append(&mut self.bytes);
        self.bytes = bytes;
        self
    }

    /// Append `#NAME:value`.
    pub fn tag(self, name: &str, value: &str) -> Self {
        self.raw_tag(name, value.as_bytes())
    }

    /// Append `#NAME:` followed by undecoded value bytes.
    pub fn raw_tag(mut self, name: &str, value: &[u8]) -> Self {
        self.bytes.push(b'#');
        self.bytes.extend_from_slice(name.as_bytes());
        self.bytes.push(b':');
        self.raw_line_contents(value);
        self
    }

    /// Append a line of text.
    pub fn line(self, line: &str) -> Self {
        self.raw_line(line.as_bytes())
    }

    /// Append a line of raw bytes.
    pub fn raw_line(mut self, line: &[u8]) -> Self {
        self.raw_line_contents(line);
        self
    }

    fn raw_line_contents(&mut self, contents: &[u8]) {
        self.bytes.extend_from_slice(contents);
        self.bytes.push(b'\n');
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Read `bytes` with a default [`Reader`], as `dir/song.txt`.
pub fn read_bytes(bytes: &[u8]) -> ReadOutcome {
    Reader::new().read(Cursor::new(bytes), "dir", "song.txt")
}

/// Expected notes body for the given text lines.
pub fn note_lines(lines: &[&str]) -> Vec<Vec<u8>> {
    lines.iter().map(|line| line.as_bytes().to_vec()).collect()
}

/// Write a song file into a fresh temporary directory.
///
/// Keep the `TempDir` alive for as long as the file is needed.
pub fn write_song_file(name: &str, file: &SongFile) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let path = dir.path().join(name);
    std::fs::write(&path, file.bytes()).expect("Failed to write song file");
    (dir, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_song_file_layout() {
        let file = SongFile::new().tag("TITLE", "A").line("E");
        assert_eq!(file.bytes(), b"#TITLE:A\nE\n");
    }

    #[test]
    fn test_bom_goes_first() {
        let file = SongFile::new().tag("TITLE", "A").with_bom();
        assert_eq!(&file.bytes()[..3], &UTF8_BOM);
        assert_eq!(&file.bytes()[3..], b"#TITLE:A\n");
    }

    #[test]
    fn test_write_song_file() {
        let file = SongFile::new().tag("TITLE", "A");
        let (_dir, path) = write_song_file("song.txt", &file);
        assert_eq!(std::fs::read(&path).unwrap(), file.bytes());
    }
}
