//! Record book configuration via `travelog.toml`
//!
//! On first open a default `travelog.toml` is written into the data
//! directory. To switch storage formats, edit the file and reopen.

use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use travelog_storage::{CodecKind, ReferencePolicy};

/// Config file name placed in the data directory.
pub const CONFIG_FILE_NAME: &str = "travelog.toml";

/// Errors reading or writing the config file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read or written
    #[error("Failed to access config file '{path}': {source}")]
    Io {
        /// Config file path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// The file is not valid TOML or holds an unknown value
    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        /// Config file path
        path: PathBuf,
        /// Parser error
        #[source]
        source: toml::de::Error,
    },

    /// The config could not be rendered as TOML
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Record book configuration loaded from `travelog.toml`.
///
/// # Example
///
/// ```toml
/// persons_format = "binary"
/// tickets_format = "object"
/// dangling_references = "keep"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookConfig {
    /// Codec variant for the persons file.
    #[serde(default = "default_persons_format")]
    pub persons_format: CodecKind,
    /// Codec variant for the tickets file.
    #[serde(default = "default_tickets_format")]
    pub tickets_format: CodecKind,
    /// What a ticket load does with a person key that does not resolve.
    #[serde(default)]
    pub dangling_references: ReferencePolicy,
}

fn default_persons_format() -> CodecKind {
    CodecKind::Binary
}

fn default_tickets_format() -> CodecKind {
    CodecKind::Object
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            persons_format: default_persons_format(),
            tickets_format: default_tickets_format(),
            dangling_references: ReferencePolicy::default(),
        }
    }
}

impl BookConfig {
    /// Same codec variant for both files.
    pub fn uniform(kind: CodecKind) -> Self {
        Self {
            persons_format: kind,
            tickets_format: kind,
            ..Self::default()
        }
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Travelog record book configuration
#
# Storage format per file: "binary", "text" or "object"
#   "binary" = length-prefixed fields, all-or-nothing load   (Persons.dat)
#   "text"   = one ';'-delimited line per record, bad lines skipped (Persons.txt)
#   "object" = keyed opaque records, all-or-nothing load      (Persons.obj)
persons_format = "binary"
tickets_format = "object"

# A ticket whose stored person key no longer resolves:
#   "keep"   = load it without a person and report it (default)
#   "reject" = fail the load
dangling_references = "keep"
"#
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<(), ConfigError> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
