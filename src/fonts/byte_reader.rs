//! Big-endian integer reads over a font buffer.
//!
//! TrueType stores every integer big-endian. [`ByteReader`] has no cursor:
//! each read takes an absolute offset, which is how table directory entries
//! address their data.

use byteorder::{BigEndian, ByteOrder};

use super::truetype_parser::{TrueTypeError, TrueTypeResult};

/// Stateless big-endian reader over a byte slice.
#[derive(Debug, Clone, Copy)]
pub struct ByteReader<'a> {
    data: &'a [u8],
}

impl<'a> ByteReader<'a> {
    /// Wrap a byte slice.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Length of the underlying buffer.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the underlying buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Borrow `len` bytes starting at `offset`.
    pub fn slice(&self, offset: usize, len: usize) -> TrueTypeResult<&'a [u8]> {
        offset
            .checked_add(len)
            .and_then(|end| self.data.get(offset..end))
            .ok_or(TrueTypeError::UnexpectedEof { offset })
    }

    /// Read an unsigned 16-bit integer.
    pub fn u16(&self, offset: usize) -> TrueTypeResult<u16> {
        self.slice(offset, 2).map(BigEndian::read_u16)
    }

    /// Read a signed 16-bit integer.
    pub fn i16(&self, offset: usize) -> TrueTypeResult<i16> {
        self.slice(offset, 2).map(BigEndian::read_i16)
    }

    /// Read an unsigned 32-bit integer.
    pub fn u32(&self, offset: usize) -> TrueTypeResult<u32> {
        self.slice(offset, 4).map(BigEndian::read_u32)
    }

    /// Read a signed 32-bit integer.
    pub fn i32(&self, offset: usize) -> TrueTypeResult<i32> {
        self.slice(offset, 4).map(BigEndian::read_i32)
    }
}
