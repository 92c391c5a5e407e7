//! Reading UltraStar song files.
//!
//! A song file is a header of `#TAG:value` lines followed by the notes body:
//!
//! ```text
//! #TITLE:Song
//! #ARTIST:Band
//! #BPM:300
//! : 0 4 10 Hel
//! : 4 4 10 lo
//! E
//! ```
//!
//! [`Reader::read`] walks the header line by line, decoding each value with
//! whatever encoding is active at that point, and copies the raw bytes of
//! everything from the first non-tag line onwards into [`Song::notes`]
//! without looking at them.
//!
//! # Example
//!
//! ```ignore
//! use usdx_reader::Reader;
//!
//! let reader = Reader::new();
//! let outcome = reader.read(file, "Band - Song", "song.txt");
//! for warning in &outcome.warnings {
//!     println!("{warning}");
//! }
//! let (song, _warnings) = outcome.into_result()?;
//! ```

mod scanner;
mod tags;

pub use scanner::{MAX_LINE_LENGTH, TAG_MARKER, is_tag_line, split_tag_line};
pub use tags::{Tag, parse_decimal, parse_int};

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use tracing::{debug, warn};

use crate::encoding::{Encoding, EncodingRegistry};
use crate::error::{ReadError, Result, Warning};
use crate::model::Song;
use scanner::Lines;
use tags::TagInterpreter;

/// UTF-8 byte order mark
pub const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Reads song files.
///
/// Holds only immutable lookup data, so one reader can serve many threads.
#[derive(Debug, Clone)]
pub struct Reader {
    encodings: EncodingRegistry,
    default_encoding: Encoding,
}

impl Reader {
    /// Reader that guesses each value's encoding unless told otherwise.
    pub fn new() -> Self {
        Self::with_default_encoding(Encoding::Auto)
    }

    /// Reader that starts every file with `encoding`.
    pub fn with_default_encoding(encoding: Encoding) -> Self {
        Self {
            encodings: EncodingRegistry::new(),
            default_encoding: encoding,
        }
    }

    pub fn default_encoding(&self) -> Encoding {
        self.default_encoding
    }

    pub fn encodings(&self) -> &EncodingRegistry {
        &self.encodings
    }

    /// Read a song from `input`.
    ///
    /// `dir` and `source_file` are stored in the song as given. The outcome
    /// always carries the song and the warnings collected, even when a fatal
    /// error cut the read short.
    pub fn read<R: Read + Seek>(&self, input: R, dir: &str, source_file: &str) -> ReadOutcome {
        let span = tracing::debug_span!(target: "reader", "read_song", dir, source_file);
        let _enter = span.enter();

        let mut song = Song::new(dir, source_file, self.default_encoding);
        let mut warnings = Vec::new();
        let error = self.read_into(input, &mut song, &mut warnings).err();
        if let Some(ref e) = error {
            warn!(target: "reader", error = %e, "Failed to read song");
        }

        ReadOutcome {
            song,
            warnings,
            error,
        }
    }

    /// Open and read the file at `path`.
    ///
    /// The song's directory is the name of the file's parent directory and
    /// its source file is the file name.
    pub fn read_path(&self, path: &Path) -> std::io::Result<ReadOutcome> {
        let file = File::open(path)?;
        let (dir, source_file) = song_ids(path);
        Ok(self.read(file, &dir, &source_file))
    }

    fn read_into<R: Read + Seek>(
        &self,
        mut input: R,
        song: &mut Song,
        warnings: &mut Vec<Warning>,
    ) -> Result<()> {
        if has_bom(&mut input)? {
            debug!(target: "reader", "Detected byte order mark, using UTF8");
            song.encoding = Encoding::Utf8;
        }

        let mut lines = Lines::new(BufReader::new(input));
        let mut interpreter = TagInterpreter::new(&self.encodings);

        loop {
            let Some(line) = lines.next_line()? else {
                // Header ran to the end of the file; the body is one empty line
                song.notes.push(Vec::new());
                return Ok(());
            };
            if !is_tag_line(line) {
                song.notes.push(line.to_vec());
                break;
            }

            let (tag, raw_value) = split_tag_line(line);
            let value = song
                .encoding
                .decode(raw_value)
                .map_err(|source| ReadError::Decode {
                    tag: tag.to_string(),
                    source,
                })?;
            interpreter.apply(song, &tag, &value, warnings);
        }

        debug!(target: "reader", line = lines.line_number(), "Header done, collecting notes");
        while let Some(line) = lines.next_line()? {
            song.notes.push(line.to_vec());
        }
        Ok(())
    }
}

impl Default for Reader {
    fn default() -> Self {
        Self::new()
    }
}

/// Directory and file name identifying the song at `path`.
pub fn song_ids(path: &Path) -> (String, String) {
    let name = |p: Option<&Path>| {
        p.and_then(Path::file_name)
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    };
    (name(path.parent()), name(Some(path)))
}

/// Consume a UTF-8 byte order mark, or rewind if there is none.
fn has_bom<R: Read + Seek>(input: &mut R) -> Result<bool> {
    let mut bom = [0u8; 3];
    input.read_exact(&mut bom).map_err(ReadError::Bom)?;
    if bom == UTF8_BOM {
        return Ok(true);
    }
    input.seek(SeekFrom::Start(0)).map_err(ReadError::Rewind)?;
    Ok(false)
}

/// Everything a read produced.
#[derive(Debug)]
pub struct ReadOutcome {
    /// The song, complete or as far as reading got
    pub song: Song,
    /// Non-fatal problems in file order
    pub warnings: Vec<Warning>,
    /// The failure that stopped the read, if any
    pub error: Option<ReadError>,
}

impl ReadOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Drop the partial song on failure.
    pub fn into_result(self) -> Result<(Song, Vec<Warning>)> {
        match self.error {
            Some(e) => Err(e),
            None => Ok((self.song, self.warnings)),
        }
    }
}
