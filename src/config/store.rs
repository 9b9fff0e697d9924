//! Configuration file storage.
//!
//! Reads a config file as a [`ConfigLayer`] and creates missing config files
//! from a resolved [`Config`]. The format follows the file extension: `.toml`
//! files are TOML, everything else is JSON.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use thiserror::Error;

use crate::config::schema::{Config, ConfigLayer};

/// Errors raised while turning command-line and file input into a [`Config`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Malformed or out-of-range command-line input.
    #[error("{message}")]
    Argument { message: String, show_usage: bool },

    /// The config file exists but could not be read.
    #[error("Error loading config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The config file could not be decoded.
    #[error("Error parsing config file {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// The resolved configuration could not be encoded.
    #[error("Error encoding config: {0}")]
    Encode(String),
}

impl ConfigError {
    /// Whether the usage text should accompany this error.
    pub fn show_usage(&self) -> bool {
        matches!(self, ConfigError::Argument { show_usage: true, .. })
    }
}

/// Where the resolver reads and creates config files.
pub trait ConfigStore {
    /// Read the file at `path`. A missing file yields `Ok(None)`.
    fn load(&self, path: &Path) -> Result<Option<ConfigLayer>, ConfigError>;

    /// Create `path` holding `snapshot`, unless a file is already there.
    ///
    /// Only encoding failures are errors; a failed write is logged and
    /// startup continues.
    fn persist_if_absent(&self, path: &Path, snapshot: &Config) -> Result<(), ConfigError>;
}

/// Config files on the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileStore;

impl ConfigStore for FileStore {
    fn load(&self, path: &Path) -> Result<Option<ConfigLayer>, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let layer = Format::of(path)
            .decode(&content)
            .map_err(|message| ConfigError::Parse {
                path: path.to_path_buf(),
                message,
            })?;

        tracing::debug!(path = %path.display(), "Config file loaded");
        Ok(Some(layer))
    }

    fn persist_if_absent(&self, path: &Path, snapshot: &Config) -> Result<(), ConfigError> {
        let content = Format::of(path)
            .encode(snapshot)
            .map_err(ConfigError::Encode)?;

        match create_new(path, content.as_bytes()) {
            Ok(()) => tracing::info!(path = %path.display(), "Created config file with defaults"),
            Err(e) => tracing::warn!(
                path = %path.display(),
                error = %e,
                "Failed to write config file"
            ),
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Toml,
}

impl Format {
    fn of(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Format::Toml,
            _ => Format::Json,
        }
    }

    fn decode(self, content: &str) -> Result<ConfigLayer, String> {
        match self {
            Format::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            Format::Toml => toml::from_str(content).map_err(|e| e.to_string()),
        }
    }

    fn encode(self, config: &Config) -> Result<String, String> {
        match self {
            Format::Json => {
                let mut buf = Vec::new();
                let formatter = PrettyFormatter::with_indent(b"\t");
                let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
                config.serialize(&mut ser).map_err(|e| e.to_string())?;
                String::from_utf8(buf).map_err(|e| e.to_string())
            }
            Format::Toml => toml::to_string_pretty(config).map_err(|e| e.to_string()),
        }
    }
}

/// Write `content` to a file that must not exist yet.
fn create_new(path: &Path, content: &[u8]) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o664);
    }
    let mut file = options.open(path)?;
    file.write_all(content)?;
    file.sync_all()
}
