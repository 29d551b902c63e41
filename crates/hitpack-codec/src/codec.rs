// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Length-prefixed little-endian reader/writer used by the binary form.

use crate::CodecLimits;
use hitpack_model::ValidationError;
use std::str;
use thiserror::Error;

/// Errors produced by the binary codec.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CodecError {
    /// Attempted to read beyond the end of the buffer.
    #[error("buffer too short")]
    OutOfBounds,
    /// UTF-8 decoding failed.
    #[error("invalid utf-8")]
    InvalidUtf8,
    /// String length exceeded the configured bound.
    #[error("string too long")]
    StringTooLong,
    /// Length prefix exceeded the remaining input or the configured bound.
    #[error("length too large")]
    LengthTooLarge,
    /// Tag or discriminant byte outside the known set.
    #[error("unknown {what} tag {tag}")]
    UnknownTag {
        /// What the tag selects.
        what: &'static str,
        /// Offending byte.
        tag: u8,
    },
    /// Presence/boolean byte other than 0 or 1.
    #[error("invalid flag byte {0}")]
    InvalidFlag(u8),
    /// Input continued after a complete envelope.
    #[error("{0} trailing bytes after envelope")]
    TrailingBytes(usize),
    /// Event field name appeared twice.
    #[error("duplicate field {0:?}")]
    DuplicateField(String),
    /// Event source bytes were not a JSON object.
    #[error("invalid event source: {0}")]
    InvalidSource(String),
    /// Decoded values violated a model invariant.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Trait for binary encoding.
pub trait Encode {
    /// Encode into the provided writer.
    fn encode(&self, writer: &mut Writer) -> Result<(), CodecError>;
}

/// Trait for binary decoding.
pub trait Decode: Sized {
    /// Decode from the provided reader.
    fn decode(reader: &mut Reader<'_>) -> Result<Self, CodecError>;
}

/// Encode a value into a fresh Vec.
pub fn encode_to_vec<T: Encode>(value: &T, limits: CodecLimits) -> Result<Vec<u8>, CodecError> {
    let mut writer = Writer::new(limits);
    value.encode(&mut writer)?;
    Ok(writer.into_vec())
}

/// Decode a value that must span the whole byte slice.
pub fn decode_from_bytes<T: Decode>(bytes: &[u8], limits: CodecLimits) -> Result<T, CodecError> {
    let mut reader = Reader::new(bytes, limits);
    let value = T::decode(&mut reader)?;
    match reader.remaining() {
        0 => Ok(value),
        n => Err(CodecError::TrailingBytes(n)),
    }
}

/// Writer for little-endian scalars and length-prefixed bytes.
#[derive(Debug, Default)]
pub struct Writer {
    buf: Vec<u8>,
    limits: CodecLimits,
}

impl Writer {
    /// Create a writer enforcing `limits`.
    #[must_use]
    pub fn new(limits: CodecLimits) -> Self {
        Self {
            buf: Vec::new(),
            limits,
        }
    }

    /// Limits in force.
    pub fn limits(&self) -> CodecLimits {
        self.limits
    }

    /// Write raw bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Write a single byte.
    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    /// Write a 0/1 byte.
    pub fn write_bool(&mut self, value: bool) {
        self.write_u8(u8::from(value));
    }

    /// Write a little-endian u32.
    pub fn write_u32_le(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Write a little-endian i32.
    pub fn write_i32_le(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Write a little-endian u64.
    pub fn write_u64_le(&mut self, value: u64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Write a little-endian i64.
    pub fn write_i64_le(&mut self, value: i64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Write a list length prefix, checked against `max_list_len`.
    pub fn write_len(&mut self, len: usize) -> Result<(), CodecError> {
        if len > self.limits.max_list_len {
            return Err(CodecError::LengthTooLarge);
        }
        let len: u32 = len.try_into().map_err(|_| CodecError::LengthTooLarge)?;
        self.write_u32_le(len);
        Ok(())
    }

    /// Write length-prefixed bytes (u32 LE length) with a max bound.
    pub fn write_len_prefixed_bytes(&mut self, bytes: &[u8], max_len: usize) -> Result<(), CodecError> {
        if bytes.len() > max_len {
            return Err(CodecError::LengthTooLarge);
        }
        let len: u32 = bytes
            .len()
            .try_into()
            .map_err(|_| CodecError::LengthTooLarge)?;
        self.write_u32_le(len);
        self.write_bytes(bytes);
        Ok(())
    }

    /// Write a length-prefixed UTF-8 string, checked against `max_string_bytes`.
    pub fn write_string(&mut self, value: &str) -> Result<(), CodecError> {
        if value.len() > self.limits.max_string_bytes {
            return Err(CodecError::StringTooLong);
        }
        self.write_len_prefixed_bytes(value.as_bytes(), usize::MAX)
    }

    /// Consume the writer and return the buffer.
    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        self.buf
    }
}

/// Reader for little-endian scalars and length-prefixed bytes.
#[derive(Debug)]
pub struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
    limits: CodecLimits,
}

impl<'a> Reader<'a> {
    /// Create a reader over the provided byte slice.
    #[must_use]
    pub fn new(bytes: &'a [u8], limits: CodecLimits) -> Self {
        Self {
            bytes,
            offset: 0,
            limits,
        }
    }

    /// Limits in force.
    pub fn limits(&self) -> CodecLimits {
        self.limits
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], CodecError> {
        let end = self
            .offset
            .checked_add(len)
            .ok_or(CodecError::OutOfBounds)?;
        if end > self.bytes.len() {
            return Err(CodecError::OutOfBounds);
        }
        let out = &self.bytes[self.offset..end];
        self.offset = end;
        Ok(out)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let chunk = self.take(N)?;
        chunk.try_into().map_err(|_| CodecError::OutOfBounds)
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> Result<u8, CodecError> {
        let [b] = self.take_array::<1>()?;
        Ok(b)
    }

    /// Read a strict 0/1 byte.
    pub fn read_bool(&mut self) -> Result<bool, CodecError> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            n => Err(CodecError::InvalidFlag(n)),
        }
    }

    /// Read a little-endian u32.
    pub fn read_u32_le(&mut self) -> Result<u32, CodecError> {
        Ok(u32::from_le_bytes(self.take_array()?))
    }

    /// Read a little-endian i32.
    pub fn read_i32_le(&mut self) -> Result<i32, CodecError> {
        Ok(i32::from_le_bytes(self.take_array()?))
    }

    /// Read a little-endian u64.
    pub fn read_u64_le(&mut self) -> Result<u64, CodecError> {
        Ok(u64::from_le_bytes(self.take_array()?))
    }

    /// Read a little-endian i64.
    pub fn read_i64_le(&mut self) -> Result<i64, CodecError> {
        Ok(i64::from_le_bytes(self.take_array()?))
    }

    /// Read a list length prefix.
    ///
    /// Every element occupies at least one byte, so a count above the
    /// remaining input is rejected before anything is allocated.
    pub fn read_len(&mut self) -> Result<usize, CodecError> {
        let len = self.read_u32_le()? as usize;
        if len > self.limits.max_list_len || len > self.remaining() {
            return Err(CodecError::LengthTooLarge);
        }
        Ok(len)
    }

    /// Read a length-prefixed byte slice with a max bound.
    pub fn read_len_prefixed_bytes(&mut self, max_len: usize) -> Result<&'a [u8], CodecError> {
        let len = self.read_u32_le()? as usize;
        if len > max_len || len > self.remaining() {
            return Err(CodecError::LengthTooLarge);
        }
        self.take(len)
    }

    /// Read a length-prefixed UTF-8 string, checked against `max_string_bytes`.
    pub fn read_string(&mut self) -> Result<String, CodecError> {
        let len = self.read_u32_le()? as usize;
        if len > self.limits.max_string_bytes {
            return Err(CodecError::StringTooLong);
        }
        if len > self.remaining() {
            return Err(CodecError::LengthTooLarge);
        }
        let bytes = self.take(len)?;
        str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|_| CodecError::InvalidUtf8)
    }
}
