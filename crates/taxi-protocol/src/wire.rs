//! Fixed-width primitives shared by every record codec.
//!
//! ```text
//! i16 / i32 / u32   little-endian, two's complement
//! bool              1 byte, 0 or 1 (anything else is rejected)
//! string            u32 byte count + UTF-8 bytes
//! identifier        1 ASCII byte, `-` reserved for "none"
//! coordinate        i32 x + i32 y
//! ```

use crate::error::{ProtocolError, ProtocolResult};
use crate::types::{Coordinate, Identifier};

/// Wire byte meaning "no identifier".
pub const NONE_ID: u8 = b'-';

/// Growable output buffer for record encoders.
pub(crate) struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub(crate) fn put_i16(&mut self, value: i16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    #[inline]
    pub(crate) fn put_i32(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    #[inline]
    pub(crate) fn put_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    #[inline]
    pub(crate) fn put_bool(&mut self, value: bool) {
        self.buf.push(u8::from(value));
    }

    /// Writes a `u32` length or count prefix.
    ///
    /// # Panics
    ///
    /// Panics if `len` does not fit in a `u32`; the prefix would not match
    /// the body that follows.
    #[inline]
    pub(crate) fn put_len(&mut self, len: usize) {
        self.put_u32(wire_len(len));
    }

    pub(crate) fn put_str(&mut self, value: &str) {
        self.put_len(value.len());
        self.buf.extend_from_slice(value.as_bytes());
    }

    #[inline]
    pub(crate) fn put_id(&mut self, id: Identifier) {
        self.buf.push(id.as_byte());
    }

    #[inline]
    pub(crate) fn put_opt_id(&mut self, id: Option<Identifier>) {
        self.buf.push(id.map_or(NONE_ID, Identifier::as_byte));
    }

    #[inline]
    pub(crate) fn put_coord(&mut self, coord: Coordinate) {
        self.put_i32(coord.x);
        self.put_i32(coord.y);
    }

    pub(crate) fn finish(self) -> Vec<u8> {
        self.buf
    }
}

fn wire_len(len: usize) -> u32 {
    match u32::try_from(len) {
        Ok(len) => len,
        Err(_) => panic!("length {len} exceeds the u32 wire prefix"),
    }
}

/// Cursor over an input buffer. Every read is bounds-checked and names the
/// field it was reading so errors point at the offending part of a record.
pub(crate) struct Reader<'a> {
    buf: &'a [u8],
    off: usize,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        Self { buf, off: 0 }
    }

    #[inline]
    pub(crate) fn remaining(&self) -> usize {
        self.buf.len() - self.off
    }

    fn take(&mut self, len: usize, field: &'static str) -> ProtocolResult<&'a [u8]> {
        let remaining = self.remaining();
        if len > remaining {
            return Err(ProtocolError::TruncatedInput {
                field,
                needed: len,
                remaining,
            });
        }
        let start = self.off;
        self.off += len;
        Ok(&self.buf[start..self.off])
    }

    fn array<const N: usize>(&mut self, field: &'static str) -> ProtocolResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N, field)?);
        Ok(out)
    }

    fn byte(&mut self, field: &'static str) -> ProtocolResult<u8> {
        let [b] = self.array::<1>(field)?;
        Ok(b)
    }

    pub(crate) fn i16(&mut self, field: &'static str) -> ProtocolResult<i16> {
        self.array(field).map(i16::from_le_bytes)
    }

    pub(crate) fn i32(&mut self, field: &'static str) -> ProtocolResult<i32> {
        self.array(field).map(i32::from_le_bytes)
    }

    pub(crate) fn u32(&mut self, field: &'static str) -> ProtocolResult<u32> {
        self.array(field).map(u32::from_le_bytes)
    }

    pub(crate) fn bool(&mut self, field: &'static str) -> ProtocolResult<bool> {
        match self.byte(field)? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(ProtocolError::MalformedEncoding {
                field,
                reason: format!("boolean byte must be 0 or 1, got 0x{other:02x}"),
            }),
        }
    }

    pub(crate) fn str(&mut self, field: &'static str) -> ProtocolResult<String> {
        let len = self.u32(field)? as usize;
        let bytes = self.take(len, field)?;
        String::from_utf8(bytes.to_vec()).map_err(|e| ProtocolError::MalformedEncoding {
            field,
            reason: e.to_string(),
        })
    }

    pub(crate) fn id(&mut self, field: &'static str) -> ProtocolResult<Identifier> {
        Identifier::from_byte(self.byte(field)?)
    }

    pub(crate) fn opt_id(&mut self, field: &'static str) -> ProtocolResult<Option<Identifier>> {
        match self.byte(field)? {
            NONE_ID => Ok(None),
            b => Identifier::from_byte(b).map(Some),
        }
    }

    pub(crate) fn coord(&mut self, field: &'static str) -> ProtocolResult<Coordinate> {
        let x = self.i32(field)?;
        let y = self.i32(field)?;
        Ok(Coordinate { x, y })
    }

    /// Reads a sequence count and checks that `count` elements of
    /// `element_size` bytes fit in what is left, before anything is allocated.
    pub(crate) fn count(&mut self, field: &'static str, element_size: usize) -> ProtocolResult<usize> {
        let count = self.u32(field)? as usize;
        let needed = count.checked_mul(element_size).unwrap_or(usize::MAX);
        let remaining = self.remaining();
        if needed > remaining {
            return Err(ProtocolError::TruncatedInput {
                field,
                needed,
                remaining,
            });
        }
        Ok(count)
    }

    /// Ends a record; leftover bytes mean the buffer was not what the caller
    /// said it was.
    pub(crate) fn finish(self, record: &'static str) -> ProtocolResult<()> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(ProtocolError::MalformedEncoding {
                field: record,
                reason: format!("{n} trailing bytes after complete record"),
            }),
        }
    }
}
