//! Record codecs.
//!
//! Three interchangeable, mutually incompatible file formats:
//!
//! - [`BinaryCodec`]: count-prefixed fixed-order fields, all-or-nothing decode
//! - [`TextCodec`]: one `;`-delimited line per record, tolerant decode
//! - [`ObjectGraphCodec`]: count-prefixed surrogate key plus opaque payload
//!
//! A record type opts into a variant by implementing [`BinaryFormat`],
//! [`TextFormat`] or [`ObjectFormat`]. The variant a store uses is picked
//! once, at construction, from a [`CodecKind`].
//!
//! # Usage
//!
//! ```ignore
//! use travelog_storage::codec::{codec_for, CodecKind};
//!
//! let codec = codec_for::<Person>(CodecKind::Text);
//! let bytes = codec.encode(&persons)?;
//! let decoded = codec.decode(&bytes)?;
//!
//! assert_eq!(decoded.records, persons);
//! ```

mod binary;
mod object;
mod text;
mod traits;

pub use binary::{BinaryCodec, BinaryFormat, FieldReader, FieldWriter, MAX_TEXT_FIELD_LEN};
pub use object::{ObjectFormat, ObjectGraphCodec};
pub use text::{parse_field, TextCodec, TextFormat, DELIMITER};
pub use traits::{Codec, CodecError, Decoded, FieldError, SkippedRecord};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Codec variant selector.
///
/// Serialized in lowercase (`"binary"`, `"text"`, `"object"`) so it can be
/// named in the configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodecKind {
    /// Packed binary format
    Binary,
    /// Delimited text format
    Text,
    /// Object-graph format
    Object,
}

impl CodecKind {
    /// All variants, in declaration order.
    pub const ALL: [CodecKind; 3] = [CodecKind::Binary, CodecKind::Text, CodecKind::Object];

    /// Stable identifier used in configuration.
    pub fn codec_id(self) -> &'static str {
        match self {
            CodecKind::Binary => "binary",
            CodecKind::Text => "text",
            CodecKind::Object => "object",
        }
    }

    /// File extension for stores written with this variant.
    pub fn extension(self) -> &'static str {
        match self {
            CodecKind::Binary => "dat",
            CodecKind::Text => "txt",
            CodecKind::Object => "obj",
        }
    }
}

impl fmt::Display for CodecKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.codec_id())
    }
}

/// Error for an unrecognized codec identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown codec: {0}")]
pub struct UnknownCodec(pub String);

impl FromStr for CodecKind {
    type Err = UnknownCodec;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CodecKind::ALL
            .into_iter()
            .find(|kind| kind.codec_id() == s)
            .ok_or_else(|| UnknownCodec(s.to_string()))
    }
}

/// Build the codec for `kind`.
pub fn codec_for<T>(kind: CodecKind) -> Box<dyn Codec<T>>
where
    T: BinaryFormat + TextFormat + ObjectFormat + 'static,
{
    match kind {
        CodecKind::Binary => Box::new(BinaryCodec),
        CodecKind::Text => Box::new(TextCodec),
        CodecKind::Object => Box::new(ObjectGraphCodec),
    }
}
