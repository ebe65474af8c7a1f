use roaring::RoaringBitmap;

use crate::buffer::BufferView;
use crate::error::{CorruptReason, Error, Result};

/// Maps dictionary id → immutable bitmap of flattened doc ids. The region
/// is a CSR-style offset table of `len + 1` big-endian `u64`s followed by
/// the concatenated `RoaringBitmap` serializations in dictionary-id order.
pub struct PostingStore<'a> {
    offsets: &'a [u8],
    data: &'a [u8],
    len: usize,
}

impl<'a> PostingStore<'a> {
    pub fn new(bytes: &'a [u8], dictionary_len: usize) -> Result<Self> {
        let table_bytes = (dictionary_len + 1)
            .checked_mul(8)
            .ok_or(Error::CorruptIndex(CorruptReason::RegionSizeMismatch {
                declared: u64::MAX,
                available: bytes.len() as u64,
            }))?;
        if bytes.len() < table_bytes {
            return Err(Error::CorruptIndex(CorruptReason::TooShort {
                have: bytes.len(),
                need: table_bytes,
            }));
        }
        let (offsets, data) = bytes.split_at(table_bytes);
        Ok(PostingStore { offsets, data, len: dictionary_len })
    }

    fn offset(&self, id: usize) -> Result<u64> {
        let view = BufferView::new(self.offsets);
        view.u64_be(id * 8)
    }

    /// Returns the raw serialized bitmap bytes for `id`, without decoding.
    fn span(&self, id: u32) -> Result<&'a [u8]> {
        let id = id as usize;
        if id >= self.len {
            return Err(Error::CorruptIndex(CorruptReason::OffsetOutOfBounds {
                offset: id as u64,
                len: self.len,
            }));
        }
        let start = self.offset(id)?;
        let end = self.offset(id + 1)?;
        if end < start {
            return Err(Error::CorruptIndex(CorruptReason::OffsetOutOfBounds {
                offset: end,
                len: self.data.len(),
            }));
        }
        let start = usize::try_from(start).map_err(|_| {
            Error::CorruptIndex(CorruptReason::OffsetOutOfBounds { offset: start, len: self.data.len() })
        })?;
        let end = usize::try_from(end).map_err(|_| {
            Error::CorruptIndex(CorruptReason::OffsetOutOfBounds { offset: end, len: self.data.len() })
        })?;
        self.data.get(start..end).ok_or(Error::CorruptIndex(CorruptReason::OffsetOutOfBounds {
            offset: end as u64,
            len: self.data.len(),
        }))
    }

    /// Decodes and returns an owned copy of the posting list for `id`.
    /// Conversion to an owned bitmap is explicit: every call allocates,
    /// there is no shared mutable cache.
    pub fn postings(&self, id: u32) -> Result<RoaringBitmap> {
        let span = self.span(id)?;
        log::trace!("decoding posting list for dictionary id {id} ({} bytes)", span.len());
        RoaringBitmap::deserialize_from(span)
            .map_err(|_| Error::CorruptIndex(CorruptReason::BitmapDecode { dictionary_id: id }))
    }
}
