//! usdx-reader - reads UltraStar Deluxe karaoke song files.
//!
//! A song file is a header of `#TAG:value` lines followed by the notes.
//! This crate turns the header into a [`Song`] the same way the UltraStar
//! Deluxe desktop application does, quirks included, and keeps the notes
//! as raw byte lines. Problems are reported as [`Warning`]s where the file is
//! still usable and as a [`ReadError`] where it is not.
//!
//! Storing, exporting and auditing songs is left to the caller.

pub mod cli;
pub mod config;
pub mod encoding;
pub mod error;
pub mod model;
pub mod reader;
#[cfg(test)]
pub mod test_utils;

pub use encoding::{Encoding, EncodingRegistry};
pub use error::{ReadError, Warning};
pub use model::{CustomTag, Song};
pub use reader::{ReadOutcome, Reader};
