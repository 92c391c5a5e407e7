//! Header tag interpretation.
//!
//! Every special case of the header lives in [`TagInterpreter::apply`]:
//! duplicate detection, the duet singer aliases, medley beats being ignored
//! in relative mode, encoding switches and the number formats.
//!
//! Numbers follow UltraStar Deluxe: decimals may use a comma as the
//! separator, and only the first comma is converted, except for `#BPM`
//! where every comma is.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::encoding::EncodingRegistry;
use crate::error::{ValueError, Warning};
use crate::model::{CustomTag, Song};

/// A header tag the format defines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Title,
    Artist,
    Mp3,
    Bpm,
    Gap,
    Cover,
    Background,
    Video,
    VideoGap,
    Genre,
    Edition,
    Creator,
    Language,
    Year,
    Start,
    End,
    Resolution,
    NotesGap,
    Relative,
    Encoding,
    PreviewStart,
    MedleyStartBeat,
    MedleyEndBeat,
    CalcMedley,
    DuetSingerP1,
    DuetSingerP2,
    P1,
    P2,
}

impl Tag {
    pub const ALL: [Tag; 28] = [
        Tag::Title,
        Tag::Artist,
        Tag::Mp3,
        Tag::Bpm,
        Tag::Gap,
        Tag::Cover,
        Tag::Background,
        Tag::Video,
        Tag::VideoGap,
        Tag::Genre,
        Tag::Edition,
        Tag::Creator,
        Tag::Language,
        Tag::Year,
        Tag::Start,
        Tag::End,
        Tag::Resolution,
        Tag::NotesGap,
        Tag::Relative,
        Tag::Encoding,
        Tag::PreviewStart,
        Tag::MedleyStartBeat,
        Tag::MedleyEndBeat,
        Tag::CalcMedley,
        Tag::DuetSingerP1,
        Tag::DuetSingerP2,
        Tag::P1,
        Tag::P2,
    ];

    /// Name as written in the file.
    pub fn name(self) -> &'static str {
        match self {
            Tag::Title => "TITLE",
            Tag::Artist => "ARTIST",
            Tag::Mp3 => "MP3",
            Tag::Bpm => "BPM",
            Tag::Gap => "GAP",
            Tag::Cover => "COVER",
            Tag::Background => "BACKGROUND",
            Tag::Video => "VIDEO",
            Tag::VideoGap => "VIDEOGAP",
            Tag::Genre => "GENRE",
            Tag::Edition => "EDITION",
            Tag::Creator => "CREATOR",
            Tag::Language => "LANGUAGE",
            Tag::Year => "YEAR",
            Tag::Start => "START",
            Tag::End => "END",
            Tag::Resolution => "RESOLUTION",
            Tag::NotesGap => "NOTESGAP",
            Tag::Relative => "RELATIVE",
            Tag::Encoding => "ENCODING",
            Tag::PreviewStart => "PREVIEWSTART",
            Tag::MedleyStartBeat => "MEDLEYSTARTBEAT",
            Tag::MedleyEndBeat => "MEDLEYENDBEAT",
            Tag::CalcMedley => "CALCMEDLEY",
            Tag::DuetSingerP1 => "DUETSINGERP1",
            Tag::DuetSingerP2 => "DUETSINGERP2",
            Tag::P1 => "P1",
            Tag::P2 => "P2",
        }
    }

    /// Exact, case-sensitive lookup.
    pub fn from_name(name: &str) -> Option<Tag> {
        Tag::ALL.into_iter().find(|tag| tag.name() == name)
    }

    /// The other spelling of the same field, if any.
    pub fn alias(self) -> Option<Tag> {
        match self {
            Tag::DuetSingerP1 => Some(Tag::P1),
            Tag::P1 => Some(Tag::DuetSingerP1),
            Tag::DuetSingerP2 => Some(Tag::P2),
            Tag::P2 => Some(Tag::DuetSingerP2),
            _ => None,
        }
    }
}

/// Applies header tags to a [`Song`], one line at a time.
///
/// Holds the per-file "seen" set, so use a new one for every file.
pub struct TagInterpreter<'r> {
    encodings: &'r EncodingRegistry,
    seen: HashSet<Tag>,
}

impl<'r> TagInterpreter<'r> {
    pub fn new(encodings: &'r EncodingRegistry) -> Self {
        Self {
            encodings,
            seen: HashSet::new(),
        }
    }

    /// Apply one decoded `name:value` pair.
    ///
    /// Recoverable problems are pushed onto `warnings`; the field they
    /// concern keeps its previous value.
    pub fn apply(&mut self, song: &mut Song, name: &str, value: &str, warnings: &mut Vec<Warning>) {
        let Some(tag) = Tag::from_name(name) else {
            warn!(target: "reader::tags", tag = name, value, "Unknown tag");
            song.custom_tags.push(CustomTag::new(name, value));
            return;
        };

        if !self.seen.insert(tag) {
            warnings.push(Warning::DuplicateTag {
                tag: name.to_string(),
            });
        }
        if let Some(alias) = tag.alias() {
            self.seen.insert(alias);
        }

        let result = match tag {
            Tag::Title => set_text(&mut song.title, value),
            Tag::Artist => set_text(&mut song.artist, value),
            Tag::Mp3 => set_text(&mut song.sound_file, value),
            // UltraStar Deluxe replaces every comma here, not just the first
            Tag::Bpm => assign(&mut song.bpm, parse_decimal(&value.replace(',', "."))),
            Tag::Gap => assign(&mut song.gap, parse_decimal(value)),
            Tag::Cover => set_text(&mut song.cover_path, value),
            Tag::Background => set_text(&mut song.background_path, value),
            Tag::Video => set_text(&mut song.video_path, value),
            Tag::VideoGap => assign(&mut song.video_gap, parse_decimal(value)),
            Tag::Genre => set_text(&mut song.genre, value),
            Tag::Edition => set_text(&mut song.edition, value),
            Tag::Creator => set_text(&mut song.creator, value),
            Tag::Language => set_text(&mut song.language, value),
            Tag::Year => {
                // Plenty of files carry an empty #YEAR:
                if value.is_empty() {
                    debug!(target: "reader::tags", "Skipping empty year");
                    Ok(())
                } else {
                    assign(&mut song.year, parse_int(value))
                }
            }
            Tag::Start => assign(&mut song.start, parse_decimal(value)),
            Tag::End => assign(&mut song.end, parse_int(value)),
            Tag::Resolution => assign(&mut song.resolution, parse_int(value)),
            Tag::NotesGap => assign(&mut song.notes_gap, parse_int(value)),
            Tag::Relative => {
                if value.to_uppercase() == "YES" {
                    song.relative = true;
                }
                Ok(())
            }
            Tag::Encoding => {
                match self.encodings.get(value) {
                    Some(encoding) => {
                        debug!(target: "reader::tags", encoding = %encoding, "Switching encoding");
                        song.encoding = encoding;
                    }
                    None => {
                        warn!(
                            target: "reader::tags",
                            name = value,
                            current = %song.encoding,
                            "Unknown encoding, keeping current one"
                        );
                    }
                }
                Ok(())
            }
            Tag::PreviewStart => assign(&mut song.preview_start, parse_decimal(value)),
            Tag::MedleyStartBeat => {
                if song.relative {
                    warn!(target: "reader::tags", value, "Ignoring medley start beat because relative is set");
                    Ok(())
                } else {
                    assign(&mut song.medley_start_beat, parse_int(value))
                }
            }
            Tag::MedleyEndBeat => {
                if song.relative {
                    warn!(target: "reader::tags", value, "Ignoring medley end beat because relative is set");
                    Ok(())
                } else {
                    assign(&mut song.medley_end_beat, parse_int(value))
                }
            }
            Tag::CalcMedley => {
                if value.to_uppercase() == "OFF" {
                    song.calc_medley = false;
                }
                Ok(())
            }
            Tag::DuetSingerP1 | Tag::P1 => set_text(&mut song.duet_singer_p1, value),
            Tag::DuetSingerP2 | Tag::P2 => set_text(&mut song.duet_singer_p2, value),
        };

        if let Err(source) = result {
            warn!(target: "reader::tags", tag = name, value, error = %source, "Failed to parse tag");
            warnings.push(Warning::InvalidValue {
                tag: name.to_string(),
                value: value.to_string(),
                source,
            });
        }
    }
}

fn set_text(field: &mut String, value: &str) -> Result<(), ValueError> {
    value.clone_into(field);
    Ok(())
}

/// Store a parsed value, leaving the field alone on failure.
fn assign<T>(field: &mut T, parsed: Result<T, ValueError>) -> Result<(), ValueError> {
    *field = parsed?;
    Ok(())
}

/// Parse a decimal that may use a comma as separator.
///
/// Surrounding whitespace is trimmed first, then only the first comma
/// becomes a period, so `"1,5,6"` is rejected as `"1.5,6"`.
pub fn parse_decimal(s: &str) -> Result<f32, ValueError> {
    let input = s.trim().replacen(',', ".", 1);
    match input.parse::<f32>() {
        Ok(value) if value.is_infinite() && !names_infinity(&input) => {
            Err(ValueError::OutOfRange { input })
        }
        Ok(value) => Ok(value),
        Err(source) => Err(ValueError::Float { input, source }),
    }
}

fn names_infinity(input: &str) -> bool {
    input
        .trim_start_matches(['+', '-'])
        .to_ascii_lowercase()
        .starts_with("inf")
}

/// Parse a base-10 integer after trimming surrounding whitespace.
pub fn parse_int(s: &str) -> Result<i64, ValueError> {
    let input = s.trim();
    input.parse::<i64>().map_err(|source| ValueError::Int {
        input: input.to_string(),
        source,
    })
}
