//! Record codec trait definitions.

use super::CodecKind;
use std::fmt;

/// Record codec trait.
///
/// A codec turns an ordered collection of records into the bytes of one
/// storage file and back. Every variant must decode its own output into an
/// equal collection, and must decode a zero-length input as an empty
/// collection.
///
/// # Thread Safety
///
/// Codecs are stateless and must be `Send + Sync`.
pub trait Codec<T>: Send + Sync {
    /// Encode the full collection.
    fn encode(&self, records: &[T]) -> Result<Vec<u8>, CodecError>;

    /// Decode a full collection.
    ///
    /// All-or-nothing variants return an error for any bad field. Tolerant
    /// variants report bad records in [`Decoded::skipped`] instead.
    fn decode(&self, data: &[u8]) -> Result<Decoded<T>, CodecError>;

    /// Which variant this is.
    fn kind(&self) -> CodecKind;
}

/// Result of a successful decode.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<T> {
    /// Records in file order
    pub records: Vec<T>,
    /// Records that were dropped by a tolerant decoder
    pub skipped: Vec<SkippedRecord>,
}

impl<T> Decoded<T> {
    /// A decode with nothing skipped.
    pub fn complete(records: Vec<T>) -> Self {
        Decoded {
            records,
            skipped: Vec::new(),
        }
    }

    /// An empty collection.
    pub fn empty() -> Self {
        Self::complete(Vec::new())
    }
}

/// A record the text decoder could not parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    /// 1-based line number in the file
    pub line: usize,
    /// Why the line was rejected
    pub reason: String,
    /// The raw line (lossily decoded if it was not UTF-8)
    pub content: String,
}

impl fmt::Display for SkippedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {} ({:?})", self.line, self.reason, self.content)
    }
}

/// A single field that could not be read.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {field}: {reason}")]
pub struct FieldError {
    /// Field name
    pub field: &'static str,
    /// Human-readable description
    pub reason: String,
}

impl FieldError {
    /// Create a field error.
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        FieldError {
            field,
            reason: reason.into(),
        }
    }
}

/// Codec errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// A record could not be decoded; the whole collection is rejected.
    #[error("Malformed record {index}: {source}")]
    Malformed {
        /// 0-based record position
        index: usize,
        /// The field that failed
        #[source]
        source: FieldError,
    },

    /// The frame header could not be read or is negative.
    #[error("Invalid record count: {0}")]
    InvalidCount(String),

    /// Object-graph frame announced zero records.
    ///
    /// An empty collection is stored as an empty file, so a present count
    /// of zero is treated as a failed load.
    #[error("Record count is zero but the stream is not empty")]
    ZeroRecordCount,

    /// A text field does not fit its length prefix.
    #[error("Field {field} of record {index} is {len} bytes, limit is {max}")]
    FieldTooLong {
        /// Field name
        field: &'static str,
        /// 0-based record position
        index: usize,
        /// Encoded length
        len: usize,
        /// Maximum encodable length
        max: usize,
    },

    /// The collection has more records than the count field can express.
    #[error("Too many records: {0}")]
    TooManyRecords(usize),

    /// Object payload serialization failed.
    #[error("Payload serialization error: {0}")]
    Payload(String),
}

impl CodecError {
    /// Wrap a field error with the position of the record it belongs to.
    pub fn malformed(index: usize, source: FieldError) -> Self {
        CodecError::Malformed { index, source }
    }
}

impl From<bincode::Error> for CodecError {
    fn from(e: bincode::Error) -> Self {
        CodecError::Payload(e.to_string())
    }
}
