//! Data directory structure
//!
//! ```text
//! data/
//! ├── travelog.toml    # Configuration
//! ├── Persons.dat      # Persons, named after the codec (.dat | .txt | .obj)
//! └── Tickets.obj      # Tickets, same naming
//! ```

use crate::config::CONFIG_FILE_NAME;
use std::path::{Path, PathBuf};
use travelog_storage::CodecKind;

/// Paths within a record book data directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    root: PathBuf,
}

impl DataPaths {
    /// Create paths from root directory
    pub fn from_root(root: impl AsRef<Path>) -> Self {
        DataPaths {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Get the root data directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the config file path
    pub fn config(&self) -> PathBuf {
        self.root.join(CONFIG_FILE_NAME)
    }

    /// Persons file for a codec variant
    pub fn persons_file(&self, kind: CodecKind) -> PathBuf {
        self.root.join(format!("Persons.{}", kind.extension()))
    }

    /// Tickets file for a codec variant
    pub fn tickets_file(&self, kind: CodecKind) -> PathBuf {
        self.root.join(format!("Tickets.{}", kind.extension()))
    }

    /// Create the data directory
    pub fn create_directories(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.root)
    }
}
