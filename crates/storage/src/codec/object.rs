//! Object-graph format
//!
//! # Layout
//!
//! ```text
//! [Record Count: i32 BE]
//! For each record:
//!   [Surrogate Key: i32 BE]
//!   [Payload Length: u32 BE]
//!   [Payload: bincode]
//! ```
//!
//! The key slot holds the resolved reference of a dependent record, and the
//! record's own position for records that reference nothing. The payload
//! never contains the reference itself.
//!
//! An empty collection is written as an empty stream. A stream that is
//! present but announces zero records fails to decode with
//! [`CodecError::ZeroRecordCount`]; files written by older releases rely on
//! that behaviour, so it is kept.

use super::binary::{FieldReader, FieldWriter};
use super::traits::{Codec, CodecError, Decoded, FieldError};
use super::CodecKind;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A record stored as a surrogate key plus an opaque payload
pub trait ObjectFormat: Sized {
    /// Everything but the reference
    type Payload: Serialize + DeserializeOwned;

    /// Key written ahead of the payload; `position` is the record's index
    fn object_key(&self, position: usize) -> i32;

    /// The payload to serialize
    fn payload(&self) -> &Self::Payload;

    /// Reassemble a record from its key and payload
    fn from_parts(key: i32, payload: Self::Payload) -> Self;
}

/// Object-graph codec
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectGraphCodec;

impl<T: ObjectFormat> Codec<T> for ObjectGraphCodec {
    fn encode(&self, records: &[T]) -> Result<Vec<u8>, CodecError> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let mut out = FieldWriter::new();
        out.write_count(records.len())?;
        for (index, record) in records.iter().enumerate() {
            out.begin_record(index);
            out.write_i32(record.object_key(index));
            let payload = bincode::serialize(record.payload())?;
            out.write_blob("payload", &payload)?;
        }
        Ok(out.into_bytes())
    }

    fn decode(&self, data: &[u8]) -> Result<Decoded<T>, CodecError> {
        if data.is_empty() {
            return Ok(Decoded::empty());
        }

        let mut input = FieldReader::new(data);
        let count = input.read_count()?;
        if count == 0 {
            return Err(CodecError::ZeroRecordCount);
        }

        let mut records = Vec::new();
        for index in 0..count {
            let key = input
                .read_i32("key")
                .map_err(|e| CodecError::malformed(index, e))?;
            let bytes = input
                .read_blob("payload")
                .map_err(|e| CodecError::malformed(index, e))?;
            let payload = bincode::deserialize(&bytes).map_err(|e| {
                CodecError::malformed(index, FieldError::new("payload", e.to_string()))
            })?;
            records.push(T::from_parts(key, payload));
        }

        if input.remaining() > 0 {
            tracing::warn!(
                trailing = input.remaining(),
                records = count,
                "Ignoring trailing bytes after object records"
            );
        }

        Ok(Decoded::complete(records))
    }

    fn kind(&self) -> CodecKind {
        CodecKind::Object
    }
}
