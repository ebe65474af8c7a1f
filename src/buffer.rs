use byteorder::{ByteOrder, BE, LE};

use crate::error::{CorruptReason, Error, Result};

/// A bounds-checked, endian-aware window onto a byte region. Every other
/// component reads through this rather than indexing the raw slice
/// directly, so out-of-bounds reads always surface as [`Error::CorruptIndex`]
/// instead of panicking on a malformed artifact.
#[derive(Clone, Copy)]
pub struct BufferView<'a> {
    bytes: &'a [u8],
}

impl<'a> BufferView<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        BufferView { bytes }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Returns the `len`-byte slice starting at `offset`, or a
    /// [`CorruptReason::OffsetOutOfBounds`] error if it would run past the
    /// end of the buffer.
    pub fn slice(&self, offset: usize, len: usize) -> Result<&'a [u8]> {
        let end = offset.checked_add(len).ok_or(Error::CorruptIndex(CorruptReason::OffsetOutOfBounds {
            offset: offset as u64,
            len: self.bytes.len(),
        }))?;
        self.bytes.get(offset..end).ok_or(Error::CorruptIndex(CorruptReason::OffsetOutOfBounds {
            offset: end as u64,
            len: self.bytes.len(),
        }))
    }

    pub fn u32_be(&self, offset: usize) -> Result<u32> {
        let s = self.slice(offset, 4)?;
        Ok(BE::read_u32(s))
    }

    pub fn u64_be(&self, offset: usize) -> Result<u64> {
        let s = self.slice(offset, 8)?;
        Ok(BE::read_u64(s))
    }

    pub fn u32_le(&self, offset: usize) -> Result<u32> {
        let s = self.slice(offset, 4)?;
        Ok(LE::read_u32(s))
    }

    pub fn u64_le(&self, offset: usize) -> Result<u64> {
        let s = self.slice(offset, 8)?;
        Ok(LE::read_u64(s))
    }
}
