//! Encoding listing command.

use std::io::Write;

use crate::config::Config;
use crate::encoding::EncodingRegistry;

/// Print the encoding names accepted by `#ENCODING` and `--encoding`.
pub fn cmd_encodings(config: &Config) -> anyhow::Result<()> {
    let mut out = std::io::stdout().lock();
    write_encodings(&mut out, config)?;
    Ok(())
}

/// One name per line, the configured default marked with `*`.
fn write_encodings<W: Write>(out: &mut W, config: &Config) -> std::io::Result<()> {
    let registry = EncodingRegistry::new();
    for name in registry.names() {
        let marker = if name == config.reader.default_encoding { "*" } else { " " };
        writeln!(out, "{} {}", marker, name)?;
    }
    Ok(())
}
