use crate::buffer::BufferView;
use crate::error::{CorruptReason, Error, Result};

/// The only version this reader understands. A builder that emits anything
/// else is rejected outright rather than guessed at.
pub const SUPPORTED_VERSION: u32 = 1;

pub const HEADER_SIZE: usize = 0x20;

/// Parsed fixed header plus the three carved regions it describes. Built
/// once at [`crate::Reader`] construction; everything downstream borrows
/// from the slices stored here.
pub struct Layout<'a> {
    pub version: u32,
    pub max_token_length: u32,
    pub dictionary: &'a [u8],
    pub postings: &'a [u8],
    pub mapping: &'a [u8],
}

impl<'a> Layout<'a> {
    pub fn parse(bytes: &'a [u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(Error::CorruptIndex(CorruptReason::TooShort {
                have: bytes.len(),
                need: HEADER_SIZE,
            }));
        }

        let view = BufferView::new(bytes);
        let version = view.u32_be(0x00)?;
        if version != SUPPORTED_VERSION {
            return Err(Error::CorruptIndex(CorruptReason::VersionMismatch {
                expected: SUPPORTED_VERSION,
                found: version,
            }));
        }

        let max_token_length = view.u32_be(0x04)?;
        let dictionary_bytes = view.u64_be(0x08)?;
        let posting_bytes = view.u64_be(0x10)?;
        let mapping_bytes = view.u64_be(0x18)?;

        let body = &bytes[HEADER_SIZE..];
        let total = dictionary_bytes
            .checked_add(posting_bytes)
            .and_then(|sum| sum.checked_add(mapping_bytes))
            .ok_or(Error::CorruptIndex(CorruptReason::RegionSizeMismatch {
                declared: u64::MAX,
                available: body.len() as u64,
            }))?;

        if total != body.len() as u64 {
            return Err(Error::CorruptIndex(CorruptReason::RegionSizeMismatch {
                declared: total,
                available: body.len() as u64,
            }));
        }

        let d = dictionary_bytes as usize;
        let p = posting_bytes as usize;
        let m = mapping_bytes as usize;

        let (dictionary, rest) = body.split_at(d);
        let (postings, mapping) = rest.split_at(p);
        debug_assert_eq!(mapping.len(), m);

        log::debug!(
            "parsed layout: version={version} max_token_length={max_token_length} \
             dictionary={d}B postings={p}B mapping={m}B"
        );

        Ok(Layout { version, max_token_length, dictionary, postings, mapping })
    }
}
