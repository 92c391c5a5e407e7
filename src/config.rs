//! Configuration for the command-line tool, stored as TOML.
//!
//! The default location is the OS-standard config directory:
//! - Windows: %APPDATA%\usdx-reader\config.toml
//! - macOS: ~/Library/Application Support/usdx-reader/config.toml
//! - Linux: ~/.config/usdx-reader/config.toml
//!
//! The library never reads this file; the CLI turns it into a
//! [`Reader`](crate::Reader) and output options.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::encoding::{Encoding, EncodingRegistry};

/// Tool configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How song files are read
    pub reader: ReaderConfig,

    /// How results are printed
    pub output: OutputConfig,
}

/// Reader settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Encoding name every file starts with ("Auto", "UTF8", "CP1250", "CP1252")
    pub default_encoding: String,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            default_encoding: Encoding::Auto.name().to_string(),
        }
    }
}

impl ReaderConfig {
    /// Resolve the configured encoding name.
    pub fn encoding(&self, registry: &EncodingRegistry) -> Result<Encoding, ConfigError> {
        registry
            .get(&self.default_encoding)
            .ok_or_else(|| ConfigError::UnknownEncoding(self.default_encoding.clone()))
    }
}

/// Output settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,

    /// Print the notes body as well as the header
    pub show_notes: bool,
}

/// Output format of the `info` command
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("usdx-reader"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from the default location.
///
/// A missing file (or no config directory at all) gives the defaults.
pub fn load() -> Result<Config, ConfigError> {
    let Some(path) = config_path() else {
        tracing::warn!(target: "config", "Could not determine config directory, using defaults");
        return Ok(Config::default());
    };

    if !path.exists() {
        tracing::info!(target: "config", path = %path.display(), "No config file found, using defaults");
        return Ok(Config::default());
    }

    load_from(&path)
}

/// Load configuration from an explicit path; the file must exist.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
    let config = toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
    tracing::info!(target: "config", path = %path.display(), "Loaded config");
    Ok(config)
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    Read(PathBuf, std::io::Error),

    #[error("Failed to parse config file {0}: {1}")]
    Parse(PathBuf, toml::de::Error),

    #[error("Unknown encoding '{0}'")]
    UnknownEncoding(String),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("[reader]"));
        assert!(toml.contains("[output]"));
        assert!(toml.contains("default_encoding = \"Auto\""));
        assert!(toml.contains("format = \"text\""));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let toml = r#"
[output]
format = "json"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(!config.output.show_notes);
        assert_eq!(config.reader.default_encoding, "Auto");
    }

    #[test]
    fn test_encoding_resolution() {
        let registry = EncodingRegistry::new();
        let config = ReaderConfig {
            default_encoding: "CP1250".to_string(),
        };
        assert_eq!(config.encoding(&registry).unwrap(), Encoding::Cp1250);

        let config = ReaderConfig {
            default_encoding: "latin1".to_string(),
        };
        assert!(matches!(
            config.encoding(&registry),
            Err(ConfigError::UnknownEncoding(name)) if name == "latin1"
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[reader]\ndefault_encoding = \"UTF8\"\n").unwrap();

        let config = load_from(&path).unwrap();
        assert_eq!(config.reader.default_encoding, "UTF8");
    }

    #[test]
    fn test_load_from_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[reader\n").unwrap();
        assert!(matches!(load_from(&path), Err(ConfigError::Parse(..))));

        let missing = dir.path().join("missing.toml");
        assert!(matches!(load_from(&missing), Err(ConfigError::Read(..))));
    }
}
