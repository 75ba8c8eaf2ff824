//! Packed binary format
//!
//! # Layout
//!
//! ```text
//! [Record Count: i32 BE]
//! For each record, fields in declaration order:
//!   text:   [Length: u16 BE][UTF-8 bytes]
//!   date:   text field holding dd-MM-yyyy
//!   number: [i32 BE]
//!   cost:   [f64 BE]
//!   flag:   [u8: 0 or 1]
//! ```
//!
//! Big-endian integers and `u16` string lengths keep the file readable by
//! the data streams older releases wrote with.
//!
//! Decoding is all-or-nothing: the first field that cannot be read rejects
//! the whole collection.

use super::traits::{Codec, CodecError, Decoded, FieldError};
use super::CodecKind;
use byteorder::{BigEndian, ReadBytesExt};
use chrono::NaiveDate;
use std::io::{self, Cursor, Read};
use travelog_core::{format_date, parse_date, DATE_PATTERN};

/// Longest text field a `u16` length prefix can describe
pub const MAX_TEXT_FIELD_LEN: usize = u16::MAX as usize;

/// A record with a fixed binary field layout
pub trait BinaryFormat: Sized {
    /// Append this record's fields.
    fn write_fields(&self, out: &mut FieldWriter) -> Result<(), CodecError>;

    /// Read one record's fields.
    fn read_fields(input: &mut FieldReader<'_>) -> Result<Self, FieldError>;
}

/// Big-endian field encoder
#[derive(Debug, Default)]
pub struct FieldWriter {
    buf: Vec<u8>,
    index: usize,
}

impl FieldWriter {
    /// Create an empty writer
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the record position used in error reports
    pub fn begin_record(&mut self, index: usize) {
        self.index = index;
    }

    /// Write a record count
    pub fn write_count(&mut self, count: usize) -> Result<(), CodecError> {
        let count = i32::try_from(count).map_err(|_| CodecError::TooManyRecords(count))?;
        self.write_i32(count);
        Ok(())
    }

    /// Write a length-prefixed UTF-8 string
    pub fn write_str(&mut self, field: &'static str, value: &str) -> Result<(), CodecError> {
        let bytes = value.as_bytes();
        let len = u16::try_from(bytes.len()).map_err(|_| CodecError::FieldTooLong {
            field,
            index: self.index,
            len: bytes.len(),
            max: MAX_TEXT_FIELD_LEN,
        })?;
        self.buf.extend_from_slice(&len.to_be_bytes());
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    /// Write a date as its canonical string
    pub fn write_date(&mut self, field: &'static str, date: NaiveDate) -> Result<(), CodecError> {
        self.write_str(field, &format_date(date))
    }

    /// Write a 32-bit integer
    pub fn write_i32(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    /// Write a double
    pub fn write_f64(&mut self, value: f64) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    /// Write a one-byte flag
    pub fn write_bool(&mut self, value: bool) {
        self.buf.push(u8::from(value));
    }

    /// Write a `u32`-length-prefixed byte string
    pub fn write_blob(&mut self, field: &'static str, bytes: &[u8]) -> Result<(), CodecError> {
        let len = u32::try_from(bytes.len()).map_err(|_| CodecError::FieldTooLong {
            field,
            index: self.index,
            len: bytes.len(),
            max: u32::MAX as usize,
        })?;
        self.buf.extend_from_slice(&len.to_be_bytes());
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    /// Consume the writer
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Big-endian field decoder over an in-memory file
#[derive(Debug)]
pub struct FieldReader<'a> {
    cursor: Cursor<&'a [u8]>,
}

fn read_failure(field: &'static str, e: io::Error) -> FieldError {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        FieldError::new(field, "unexpected end of input")
    } else {
        FieldError::new(field, e.to_string())
    }
}

impl<'a> FieldReader<'a> {
    /// Read from `data`
    pub fn new(data: &'a [u8]) -> Self {
        FieldReader {
            cursor: Cursor::new(data),
        }
    }

    /// Bytes not consumed yet
    pub fn remaining(&self) -> usize {
        let len = self.cursor.get_ref().len() as u64;
        len.saturating_sub(self.cursor.position()) as usize
    }

    /// Read a record count; negative counts are rejected
    pub fn read_count(&mut self) -> Result<usize, CodecError> {
        let count = self
            .cursor
            .read_i32::<BigEndian>()
            .map_err(|e| CodecError::InvalidCount(read_failure("count", e).reason))?;
        usize::try_from(count)
            .map_err(|_| CodecError::InvalidCount(format!("negative count {}", count)))
    }

    /// Read a length-prefixed UTF-8 string
    pub fn read_str(&mut self, field: &'static str) -> Result<String, FieldError> {
        let len = self
            .cursor
            .read_u16::<BigEndian>()
            .map_err(|e| read_failure(field, e))?;
        let mut bytes = vec![0u8; usize::from(len)];
        self.cursor
            .read_exact(&mut bytes)
            .map_err(|e| read_failure(field, e))?;
        String::from_utf8(bytes)
            .map_err(|e| FieldError::new(field, format!("invalid UTF-8: {}", e)))
    }

    /// Read a date stored as its canonical string
    pub fn read_date(&mut self, field: &'static str) -> Result<NaiveDate, FieldError> {
        let text = self.read_str(field)?;
        parse_date(&text).map_err(|e| {
            FieldError::new(field, format!("{:?} is not {}: {}", text, DATE_PATTERN, e))
        })
    }

    /// Read a 32-bit integer
    pub fn read_i32(&mut self, field: &'static str) -> Result<i32, FieldError> {
        self.cursor
            .read_i32::<BigEndian>()
            .map_err(|e| read_failure(field, e))
    }

    /// Read a double
    pub fn read_f64(&mut self, field: &'static str) -> Result<f64, FieldError> {
        self.cursor
            .read_f64::<BigEndian>()
            .map_err(|e| read_failure(field, e))
    }

    /// Read a one-byte flag
    pub fn read_bool(&mut self, field: &'static str) -> Result<bool, FieldError> {
        match self.cursor.read_u8().map_err(|e| read_failure(field, e))? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(FieldError::new(field, format!("invalid flag byte {:#04x}", other))),
        }
    }

    /// Read a `u32`-length-prefixed byte string
    pub fn read_blob(&mut self, field: &'static str) -> Result<Vec<u8>, FieldError> {
        let len = self
            .cursor
            .read_u32::<BigEndian>()
            .map_err(|e| read_failure(field, e))? as usize;
        if len > self.remaining() {
            return Err(FieldError::new(field, "unexpected end of input"));
        }
        let mut bytes = vec![0u8; len];
        self.cursor
            .read_exact(&mut bytes)
            .map_err(|e| read_failure(field, e))?;
        Ok(bytes)
    }
}

/// Packed binary codec
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryCodec;

impl<T: BinaryFormat> Codec<T> for BinaryCodec {
    fn encode(&self, records: &[T]) -> Result<Vec<u8>, CodecError> {
        let mut out = FieldWriter::new();
        out.write_count(records.len())?;
        for (index, record) in records.iter().enumerate() {
            out.begin_record(index);
            record.write_fields(&mut out)?;
        }
        Ok(out.into_bytes())
    }

    fn decode(&self, data: &[u8]) -> Result<Decoded<T>, CodecError> {
        if data.is_empty() {
            return Ok(Decoded::empty());
        }

        let mut input = FieldReader::new(data);
        let count = input.read_count()?;

        let mut records = Vec::new();
        for index in 0..count {
            let record = T::read_fields(&mut input).map_err(|e| CodecError::malformed(index, e))?;
            records.push(record);
        }

        if input.remaining() > 0 {
            tracing::warn!(
                trailing = input.remaining(),
                records = count,
                "Ignoring trailing bytes after binary records"
            );
        }

        Ok(Decoded::complete(records))
    }

    fn kind(&self) -> CodecKind {
        CodecKind::Binary
    }
}
