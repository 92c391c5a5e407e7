//! Character encodings for song file tag values.
//!
//! Song files predate any agreement on a character set. Files written by
//! newer tools are UTF-8 (often with a byte order mark), older ones are in a
//! Windows code page. The `#ENCODING` tag can name one explicitly; without
//! it, [`Encoding::Auto`] guesses per value.
//!
//! Decoding uses `encoding_rs` for the Windows code pages.

mod detect;

pub use detect::looks_like_utf8;

use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

/// A decoding strategy selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Encoding {
    /// UTF-8, malformed sequences replaced with U+FFFD
    Utf8,
    /// Windows-1250 (Central European)
    Cp1250,
    /// Windows-1252 (Western European)
    Cp1252,
    /// UTF-8 if the value looks like it, Windows-1250 otherwise
    #[default]
    Auto,
}

impl Encoding {
    /// Every encoding, in registration order.
    pub const ALL: [Encoding; 4] = [
        Encoding::Auto,
        Encoding::Utf8,
        Encoding::Cp1250,
        Encoding::Cp1252,
    ];

    /// Name as written in the `#ENCODING` tag.
    pub fn name(&self) -> &'static str {
        match self {
            Encoding::Utf8 => "UTF8",
            Encoding::Cp1250 => "CP1250",
            Encoding::Cp1252 => "CP1252",
            Encoding::Auto => "Auto",
        }
    }

    /// Decode a raw tag value.
    ///
    /// Malformed UTF-8 becomes U+FFFD and the code pages map every byte, so
    /// none of the built-in encodings fail.
    pub fn decode<'a>(&self, raw: &'a [u8]) -> Result<Cow<'a, str>, DecodeError> {
        match self {
            Encoding::Utf8 => Ok(String::from_utf8_lossy(raw)),
            Encoding::Cp1250 => Ok(decode_code_page(encoding_rs::WINDOWS_1250, raw)),
            Encoding::Cp1252 => Ok(decode_code_page(encoding_rs::WINDOWS_1252, raw)),
            Encoding::Auto => {
                if looks_like_utf8(raw) {
                    Encoding::Utf8.decode(raw)
                } else {
                    Encoding::Cp1250.decode(raw)
                }
            }
        }
    }

    /// Decode for display, falling back to lossy UTF-8 on failure.
    pub fn decode_lossy<'a>(&self, raw: &'a [u8]) -> Cow<'a, str> {
        self.decode(raw)
            .unwrap_or_else(|_| String::from_utf8_lossy(raw))
    }
}

fn decode_code_page<'a>(encoding: &'static encoding_rs::Encoding, raw: &'a [u8]) -> Cow<'a, str> {
    let (text, had_errors) = encoding.decode_without_bom_handling(raw);
    if had_errors {
        tracing::debug!(target: "encoding", encoding = encoding.name(), "Unmappable bytes replaced");
    }
    text
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Encoding {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Failure to decode a tag value.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}

/// Lookup of encodings by their tag name.
///
/// Built once and shared by every read; it is never mutated afterwards.
#[derive(Debug, Clone)]
pub struct EncodingRegistry {
    by_name: HashMap<&'static str, Encoding>,
}

impl EncodingRegistry {
    /// Registry holding every [`Encoding`].
    pub fn new() -> Self {
        Self::from_encodings(Encoding::ALL)
    }

    /// Build a registry from the given encodings.
    ///
    /// A repeated name is logged and the later entry replaces the earlier one.
    pub fn from_encodings(encodings: impl IntoIterator<Item = Encoding>) -> Self {
        let mut by_name = HashMap::new();
        for encoding in encodings {
            let name = encoding.name();
            if by_name.insert(name, encoding).is_some() {
                tracing::warn!(target: "encoding", encoding = name, "Duplicate encoding");
            }
        }
        Self { by_name }
    }

    /// Find an encoding by its exact, case-sensitive name.
    pub fn get(&self, name: &str) -> Option<Encoding> {
        self.by_name.get(name).copied()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.by_name.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl Default for EncodingRegistry {
    fn default() -> Self {
        Self::new()
    }
}
