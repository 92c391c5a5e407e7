//! The parsed song record.
//!
//! A [`Song`] mirrors the header of an UltraStar song file plus the
//! untouched notes body. It is built fresh for every read and handed to the
//! caller, who decides where it goes (database, export, file checks).

use serde::{Serialize, Serializer};
use std::borrow::Cow;

use crate::encoding::Encoding;

/// Default `#RESOLUTION` (beats per quarter note)
pub const DEFAULT_RESOLUTION: i64 = 4;

/// A song file's header fields and notes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Song {
    /// Directory of the song, as given by the caller
    pub dir: String,
    /// File name of the song, as given by the caller
    pub source_file: String,

    pub title: String,
    pub artist: String,
    /// `#MP3`, path of the audio file relative to `dir`
    pub sound_file: String,
    /// Beats per minute
    pub bpm: f32,
    /// Milliseconds before the first beat
    pub gap: f32,
    pub cover_path: String,
    pub background_path: String,
    pub video_path: String,
    /// Seconds to skip into the video
    pub video_gap: f32,
    pub genre: String,
    pub edition: String,
    pub creator: String,
    pub language: String,
    pub year: i64,
    /// Seconds into the audio where singing starts
    pub start: f32,
    /// Milliseconds into the audio where the song ends
    pub end: i64,
    pub resolution: i64,
    pub notes_gap: i64,
    /// Beats are relative to the start of each line
    pub relative: bool,
    /// Encoding active when the header ended
    pub encoding: Encoding,
    /// Seconds into the audio for the song selection preview
    pub preview_start: f32,
    pub medley_start_beat: i64,
    pub medley_end_beat: i64,
    /// Whether the medley section may be calculated automatically
    pub calc_medley: bool,
    pub duet_singer_p1: String,
    pub duet_singer_p2: String,

    /// Unrecognized tags in file order
    pub custom_tags: Vec<CustomTag>,
    /// Notes body, one entry per line, as raw bytes without terminators
    #[serde(serialize_with = "serialize_lines")]
    pub notes: Vec<Vec<u8>>,
}

impl Song {
    /// An empty song with the format's defaults.
    pub fn new(dir: impl Into<String>, source_file: impl Into<String>, encoding: Encoding) -> Self {
        Self {
            dir: dir.into(),
            source_file: source_file.into(),
            title: String::new(),
            artist: String::new(),
            sound_file: String::new(),
            bpm: 0.0,
            gap: 0.0,
            cover_path: String::new(),
            background_path: String::new(),
            video_path: String::new(),
            video_gap: 0.0,
            genre: String::new(),
            edition: String::new(),
            creator: String::new(),
            language: String::new(),
            year: 0,
            start: 0.0,
            end: 0,
            resolution: DEFAULT_RESOLUTION,
            notes_gap: 0,
            relative: false,
            encoding,
            preview_start: 0.0,
            medley_start_beat: 0,
            medley_end_beat: 0,
            calc_medley: true,
            duet_singer_p1: String::new(),
            duet_singer_p2: String::new(),
            custom_tags: Vec::new(),
            notes: Vec::new(),
        }
    }

    /// Look up the value of a custom tag by name (first occurrence).
    pub fn custom_tag(&self, name: &str) -> Option<&str> {
        self.custom_tags
            .iter()
            .find(|t| t.tag == name)
            .map(|t| t.content.as_str())
    }

    /// Notes body decoded with the song's encoding, for display.
    pub fn notes_text(&self) -> impl Iterator<Item = Cow<'_, str>> {
        self.notes.iter().map(|line| self.encoding.decode_lossy(line))
    }

    /// Media paths named in the header, skipping unset ones.
    ///
    /// Returns `(kind, path)` pairs, e.g. `("sound", "song.mp3")`.
    pub fn media_files(&self) -> Vec<(&'static str, &str)> {
        [
            ("sound", self.sound_file.as_str()),
            ("cover", self.cover_path.as_str()),
            ("background", self.background_path.as_str()),
            ("video", self.video_path.as_str()),
        ]
        .into_iter()
        .filter(|(_, path)| !path.is_empty())
        .collect()
    }
}

fn serialize_lines<S: Serializer>(lines: &[Vec<u8>], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(lines.iter().map(|line| String::from_utf8_lossy(line)))
}

impl Default for Song {
    fn default() -> Self {
        Self::new("", "", Encoding::default())
    }
}

/// An unrecognized `#NAME:value` header line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomTag {
    pub tag: String,
    pub content: String,
}

impl CustomTag {
    pub fn new(tag: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let song = Song::new("Artist - Title", "song.txt", Encoding::Auto);
        assert_eq!(song.dir, "Artist - Title");
        assert_eq!(song.source_file, "song.txt");
        assert_eq!(song.encoding, Encoding::Auto);
        assert_eq!(song.resolution, 4);
        assert!(song.calc_medley);
        assert!(!song.relative);
        assert_eq!(song.bpm, 0.0);
        assert_eq!(song.year, 0);
        assert!(song.title.is_empty());
        assert!(song.custom_tags.is_empty());
        assert!(song.notes.is_empty());
    }

    #[test]
    fn test_custom_tag_lookup() {
        let mut song = Song::default();
        song.custom_tags.push(CustomTag::new("AUTHOR", "someone"));
        song.custom_tags.push(CustomTag::new("AUTHOR", "someone else"));
        assert_eq!(song.custom_tag("AUTHOR"), Some("someone"));
        assert_eq!(song.custom_tag("MISSING"), None);
    }

    #[test]
    fn test_media_files_skips_empty() {
        let song = Song {
            sound_file: "song.mp3".to_string(),
            video_path: "song.mp4".to_string(),
            ..Song::default()
        };
        assert_eq!(
            song.media_files(),
            vec![("sound", "song.mp3"), ("video", "song.mp4")]
        );
    }

    #[test]
    fn test_serializes_to_json() {
        let song = Song::new("dir", "file.txt", Encoding::Utf8);
        let json = serde_json::to_value(&song).unwrap();
        assert_eq!(json["encoding"], "UTF8");
        assert_eq!(json["resolution"], 4);
        assert_eq!(json["calc_medley"], true);
    }

    #[test]
    fn test_notes_text_uses_song_encoding() {
        let song = Song {
            encoding: Encoding::Cp1250,
            notes: vec![b": 0 1 0 \xB9".to_vec(), b"E".to_vec()],
            ..Song::default()
        };
        let text: Vec<_> = song.notes_text().collect();
        assert_eq!(text, vec![": 0 1 0 ą", "E"]);
        // the raw bytes are untouched
        assert_eq!(song.notes[0], b": 0 1 0 \xB9");
    }

    #[test]
    fn test_notes_serialize_as_strings() {
        let song = Song {
            notes: vec![b": 0 4 10 Hel".to_vec(), b"\xFF".to_vec()],
            ..Song::default()
        };
        let json = serde_json::to_value(&song).unwrap();
        assert_eq!(json["notes"][0], ": 0 4 10 Hel");
        assert_eq!(json["notes"][1], "\u{FFFD}");
    }
}
