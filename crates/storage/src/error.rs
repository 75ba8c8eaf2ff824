//! Load and save errors, and what a successful load reports
//!
//! Failure kinds:
//!
//! - I/O: the storage file cannot be created, read or written
//!   ([`LoadError::NotFound`], [`LoadError::Io`], [`SaveError::IoFailure`])
//! - Malformed: an all-or-nothing codec rejected the file
//!   ([`LoadError::Malformed`])
//! - Skipped record: the text codec dropped one line; the load still
//!   succeeds and lists it in [`LoadReport::skipped`]
//! - Dangling reference: a stored key did not resolve; the entity is kept
//!   with no reference and listed in [`LoadReport::dangling`], unless the
//!   store rejects dangling references ([`LoadError::MissingReference`])

use crate::codec::{CodecError, SkippedRecord};
use std::io;
use std::path::PathBuf;

/// Errors from [`EntityStore::load`](crate::store::EntityStore)
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The storage file or its directory could not be created
    #[error("Cannot create storage at {path}: {source}")]
    NotFound {
        /// Storage file path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// The storage file could not be read
    #[error("Cannot read {path}: {source}")]
    Io {
        /// Storage file path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// The codec rejected the file
    #[error("Malformed data in {path}: {source}")]
    Malformed {
        /// Storage file path
        path: PathBuf,
        /// Decode failure
        #[source]
        source: CodecError,
    },

    /// A stored reference did not resolve and the store rejects dangling
    /// references
    #[error("Record {index} in {path} refers to missing entity {key}")]
    MissingReference {
        /// Storage file path
        path: PathBuf,
        /// 0-based record position
        index: usize,
        /// The stored surrogate key
        key: i32,
    },
}

/// Errors from [`EntityStore::save`](crate::store::EntityStore)
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    /// Writing the storage file failed; the file may be partially written
    #[error("Cannot write {path}: {source}")]
    IoFailure {
        /// Storage file path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// The collection could not be encoded; the file was not touched
    #[error("Cannot encode {path}: {source}")]
    Encode {
        /// Storage file path
        path: PathBuf,
        /// Encode failure
        #[source]
        source: CodecError,
    },
}

/// A stored reference that did not resolve on load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DanglingReference {
    /// Position of the entity in the loaded collection
    pub index: usize,
    /// The stored surrogate key
    pub key: i32,
}

/// Outcome of a successful load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    /// Storage file path
    pub path: PathBuf,
    /// Number of entities now in memory
    pub loaded: usize,
    /// Lines the text codec dropped
    pub skipped: Vec<SkippedRecord>,
    /// Entities whose reference did not resolve
    pub dangling: Vec<DanglingReference>,
}

impl LoadReport {
    /// Report for an empty storage file
    pub fn empty(path: PathBuf) -> Self {
        LoadReport {
            path,
            loaded: 0,
            skipped: Vec::new(),
            dangling: Vec::new(),
        }
    }

    /// True if nothing was skipped and every reference resolved
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.dangling.is_empty()
    }
}
