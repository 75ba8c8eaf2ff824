//! Delimited text format
//!
//! One record per line, fields joined by [`DELIMITER`], `\n` after every
//! record. Values are written as-is: a value that contains the delimiter or
//! a line break produces a line that will not decode, so encoding logs a
//! warning for such values.
//!
//! Decoding is tolerant. A line with the wrong number of fields, a field
//! that does not parse, or bytes that are not UTF-8 is reported as a
//! [`SkippedRecord`] and decoding continues with the next line. Blank lines
//! are ignored.

use super::traits::{Codec, CodecError, Decoded, FieldError, SkippedRecord};
use super::CodecKind;
use std::fmt::Display;
use std::str::FromStr;

/// Field separator
pub const DELIMITER: char = ';';

/// A record with a fixed text field layout
pub trait TextFormat: Sized {
    /// Number of fields on every line
    const FIELD_COUNT: usize;

    /// Field values in layout order
    fn to_fields(&self) -> Vec<String>;

    /// Parse a line already split into exactly `FIELD_COUNT` values
    fn from_fields(fields: &[&str]) -> Result<Self, FieldError>;
}

/// Parse one field with `FromStr`, naming the field on failure
pub fn parse_field<F>(field: &'static str, value: &str) -> Result<F, FieldError>
where
    F: FromStr,
    F::Err: Display,
{
    value
        .parse()
        .map_err(|e| FieldError::new(field, format!("{:?}: {}", value, e)))
}

/// Delimited text codec
#[derive(Debug, Clone, Copy, Default)]
pub struct TextCodec;

impl<T: TextFormat> Codec<T> for TextCodec {
    fn encode(&self, records: &[T]) -> Result<Vec<u8>, CodecError> {
        let separator = DELIMITER.to_string();
        let mut out = String::new();
        for (index, record) in records.iter().enumerate() {
            let fields = record.to_fields();
            let unsafe_value = fields.iter().any(|value| {
                value.contains(DELIMITER) || value.contains('\n') || value.contains('\r')
            });
            if unsafe_value {
                tracing::warn!(
                    record = index,
                    "Text record contains a delimiter or line break and will not decode"
                );
            }
            out.push_str(&fields.join(separator.as_str()));
            out.push('\n');
        }
        Ok(out.into_bytes())
    }

    fn decode(&self, data: &[u8]) -> Result<Decoded<T>, CodecError> {
        let mut decoded = Decoded::empty();

        for (offset, raw) in data.split(|&b| b == b'\n').enumerate() {
            let line = offset + 1;
            let raw = match raw.last() {
                Some(b'\r') => &raw[..raw.len() - 1],
                _ => raw,
            };
            if raw.is_empty() {
                continue;
            }

            let text = match std::str::from_utf8(raw) {
                Ok(text) => text,
                Err(e) => {
                    decoded.skipped.push(SkippedRecord {
                        line,
                        reason: format!("invalid UTF-8: {}", e),
                        content: String::from_utf8_lossy(raw).into_owned(),
                    });
                    continue;
                }
            };

            let fields: Vec<&str> = text.split(DELIMITER).collect();
            let parsed = if fields.len() == T::FIELD_COUNT {
                T::from_fields(&fields).map_err(|e| e.to_string())
            } else {
                Err(format!(
                    "expected {} fields, found {}",
                    T::FIELD_COUNT,
                    fields.len()
                ))
            };

            match parsed {
                Ok(record) => decoded.records.push(record),
                Err(reason) => decoded.skipped.push(SkippedRecord {
                    line,
                    reason,
                    content: text.to_string(),
                }),
            }
        }

        Ok(decoded)
    }

    fn kind(&self) -> CodecKind {
        CodecKind::Text
    }
}
