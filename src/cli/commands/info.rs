//! Song file inspection command.

use anyhow::{Context, anyhow};
use serde_json::json;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

use crate::config::{Config, OutputFormat};
use crate::encoding::EncodingRegistry;
use crate::reader::{ReadOutcome, Reader, song_ids};

/// Options of the `info` command, after merging flags and config
#[derive(Debug, Clone, Default)]
pub struct InfoOptions {
    pub dir: Option<String>,
    pub source: Option<String>,
    pub encoding: Option<String>,
    pub format: OutputFormat,
    pub show_notes: bool,
}

/// Read a song file and print the result to stdout.
pub fn cmd_info(config: &Config, path: &Path, options: &InfoOptions) -> anyhow::Result<()> {
    let mut out = std::io::stdout().lock();
    run_info(&mut out, config, path, options)
}

/// Read a song file and write the report to `out`.
///
/// The report is written even when reading failed; the failure is returned
/// afterwards so the process exits non-zero.
pub fn run_info<W: Write>(
    out: &mut W,
    config: &Config,
    path: &Path,
    options: &InfoOptions,
) -> anyhow::Result<()> {
    let reader = build_reader(config, options.encoding.as_deref())?;

    let (default_dir, default_source) = song_ids(path);
    let dir = options.dir.clone().unwrap_or(default_dir);
    let source = options.source.clone().unwrap_or(default_source);

    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    debug!(target: "cli::info", path = %path.display(), encoding = %reader.default_encoding(), "Reading song");
    let outcome = reader.read(file, &dir, &source);
    info!(
        target: "cli::info",
        path = %path.display(),
        warnings = outcome.warnings.len(),
        ok = outcome.is_ok(),
        "Read song"
    );

    match options.format {
        OutputFormat::Text => write_text(out, &outcome, options.show_notes)?,
        OutputFormat::Json => write_json(out, &outcome, options.show_notes)?,
    }

    match outcome.error {
        Some(e) => Err(anyhow::Error::new(e).context(format!("Failed to read {}", path.display()))),
        None => Ok(()),
    }
}

fn build_reader(config: &Config, encoding: Option<&str>) -> anyhow::Result<Reader> {
    let registry = EncodingRegistry::new();
    let encoding = match encoding {
        Some(name) => registry
            .get(name)
            .ok_or_else(|| anyhow!("Unknown encoding '{}' (try `encodings`)", name))?,
        None => config.reader.encoding(&registry)?,
    };
    Ok(Reader::with_default_encoding(encoding))
}

fn write_text<W: Write>(out: &mut W, outcome: &ReadOutcome, show_notes: bool) -> std::io::Result<()> {
    let song = &outcome.song;

    writeln!(out, "File: {}", Path::new(&song.dir).join(&song.source_file).display())?;
    let text_fields: [(&str, &str); 12] = [
        ("Title", &song.title),
        ("Artist", &song.artist),
        ("Genre", &song.genre),
        ("Edition", &song.edition),
        ("Creator", &song.creator),
        ("Language", &song.language),
        ("MP3", &song.sound_file),
        ("Cover", &song.cover_path),
        ("Background", &song.background_path),
        ("Video", &song.video_path),
        ("Duet P1", &song.duet_singer_p1),
        ("Duet P2", &song.duet_singer_p2),
    ];
    for (label, value) in text_fields.iter().filter(|(_, v)| !v.is_empty()) {
        writeln!(out, "  {:<16}{}", format!("{label}:"), value)?;
    }

    let number_fields = [
        ("BPM", song.bpm.to_string()),
        ("Gap", song.gap.to_string()),
        ("Video gap", song.video_gap.to_string()),
        ("Year", song.year.to_string()),
        ("Start", song.start.to_string()),
        ("End", song.end.to_string()),
        ("Resolution", song.resolution.to_string()),
        ("Notes gap", song.notes_gap.to_string()),
        ("Preview start", song.preview_start.to_string()),
        ("Medley start", song.medley_start_beat.to_string()),
        ("Medley end", song.medley_end_beat.to_string()),
        ("Relative", song.relative.to_string()),
        ("Calc medley", song.calc_medley.to_string()),
        ("Encoding", song.encoding.to_string()),
    ];
    for (label, value) in &number_fields {
        writeln!(out, "  {:<16}{}", format!("{label}:"), value)?;
    }

    if !song.custom_tags.is_empty() {
        writeln!(out, "Custom tags:")?;
        for tag in &song.custom_tags {
            writeln!(out, "  {}: {}", tag.tag, tag.content)?;
        }
    }

    writeln!(out, "Notes: {} lines", song.notes.len())?;
    if show_notes {
        for line in song.notes_text() {
            writeln!(out, "  {}", line)?;
        }
    }

    if !outcome.warnings.is_empty() {
        writeln!(out, "Warnings:")?;
        for warning in &outcome.warnings {
            writeln!(out, "  - {}", warning)?;
        }
    }
    if let Some(ref e) = outcome.error {
        writeln!(out, "Error: {}", e)?;
    }
    Ok(())
}

fn write_json<W: Write>(out: &mut W, outcome: &ReadOutcome, show_notes: bool) -> anyhow::Result<()> {
    let mut song = serde_json::to_value(&outcome.song)?;
    if let Some(fields) = song.as_object_mut() {
        if show_notes {
            let notes: Vec<_> = outcome.song.notes_text().collect();
            fields.insert("notes".to_string(), json!(notes));
        } else {
            fields.remove("notes");
        }
    }
    let report = json!({
        "song": song,
        "warnings": outcome.warnings.iter().map(|w| w.to_string()).collect::<Vec<_>>(),
        "error": outcome.error.as_ref().map(|e| e.to_string()),
    });
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}
