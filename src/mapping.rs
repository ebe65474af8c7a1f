use crate::buffer::BufferView;
use crate::error::{CorruptReason, Error, Result};

/// The flattened-doc-id → source-doc-id array: a strictly non-decreasing,
/// little-endian `u32` array, the one region of the artifact not stored
/// big-endian.
pub struct FlatToSource<'a> {
    bytes: &'a [u8],
    len: usize,
}

impl<'a> FlatToSource<'a> {
    pub fn new(bytes: &'a [u8]) -> Result<Self> {
        if bytes.len() % 4 != 0 {
            return Err(Error::CorruptIndex(CorruptReason::RegionSizeMismatch {
                declared: bytes.len() as u64,
                available: (bytes.len() / 4 * 4) as u64,
            }));
        }
        Ok(FlatToSource { bytes, len: bytes.len() / 4 })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns [`Error::CorruptIndex`] if `flat` is out of range rather than
    /// panicking. The caller only ever passes ids that came out of a
    /// posting list decoded from the same artifact, but a corrupt artifact
    /// could still disagree about ranges.
    pub fn to_source(&self, flat: u32) -> Result<u32> {
        let flat = flat as usize;
        if flat >= self.len {
            return Err(Error::CorruptIndex(CorruptReason::OffsetOutOfBounds {
                offset: flat as u64,
                len: self.len,
            }));
        }
        let view = BufferView::new(self.bytes);
        view.u32_le(flat * 4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(ids: &[u32]) -> Vec<u8> {
        let mut out = Vec::new();
        for id in ids {
            out.extend_from_slice(&id.to_le_bytes());
        }
        out
    }

    #[test]
    fn resolves_known_layout() {
        let bytes = build(&[0, 0, 0, 0, 0, 1, 1, 1, 2, 2]);
        let map = FlatToSource::new(&bytes).unwrap();
        assert_eq!(map.len(), 10);
        assert_eq!(map.to_source(0).unwrap(), 0);
        assert_eq!(map.to_source(5).unwrap(), 1);
        assert_eq!(map.to_source(9).unwrap(), 2);
    }

    #[test]
    fn rejects_out_of_range() {
        let bytes = build(&[0, 1]);
        let map = FlatToSource::new(&bytes).unwrap();
        assert!(map.to_source(2).is_err());
    }

    #[test]
    fn rejects_misaligned_region() {
        let bytes = vec![0u8; 3];
        assert!(FlatToSource::new(&bytes).is_err());
    }
}
