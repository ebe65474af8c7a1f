use std::fmt;

/// The reader's single error type, covering both construction (header decode)
/// and query-time failures. Mirrors the taxonomy a caller needs to branch on;
/// no catch-all `Other` variant, so a new failure mode has to be named here.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Header version mismatch, inconsistent region sizes, or an offset that
    /// escapes the mapped buffer. Fatal to the reader instance that produced
    /// it.
    #[error("corrupt index: {0}")]
    CorruptIndex(CorruptReason),

    /// A key path failed to parse (unbalanced brackets, non-integer index).
    #[error("malformed key {key:?}: {reason}")]
    MalformedKey { key: String, reason: &'static str },

    /// A predicate kind outside EQ/NOT_EQ/IN/NOT_IN/IS_NULL/IS_NOT_NULL, or a
    /// filter leaf whose key is not a plain identifier.
    #[error("unsupported predicate: {0}")]
    UnsupportedPredicate(String),

    /// An exclusive predicate (NOT_EQ, NOT_IN, IS_NULL) appeared as a child
    /// of an AND/OR node instead of at the filter root.
    #[error("exclusive predicate is only valid at the filter root")]
    NestedExclusive,

    /// The caller-supplied cancellation check reported cancellation.
    #[error("query cancelled")]
    Cancelled,

    /// Opening or mapping the backing file failed, surfaced only by the
    /// `open_mmap` convenience constructor. The borrowed-bytes constructor
    /// never performs I/O.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Structured detail for [`Error::CorruptIndex`], kept separate from the
/// enum so `Display` can format each failure mode precisely without a
/// string built ad hoc at every call site.
#[derive(Debug)]
pub enum CorruptReason {
    TooShort { have: usize, need: usize },
    VersionMismatch { expected: u32, found: u32 },
    RegionSizeMismatch { declared: u64, available: u64 },
    OffsetOutOfBounds { offset: u64, len: usize },
    BitmapDecode { dictionary_id: u32 },
}

impl fmt::Display for CorruptReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorruptReason::TooShort { have, need } => {
                write!(f, "buffer too short: have {have} bytes, need at least {need}")
            }
            CorruptReason::VersionMismatch { expected, found } => {
                write!(f, "unsupported version {found} (expected {expected})")
            }
            CorruptReason::RegionSizeMismatch { declared, available } => write!(
                f,
                "header declares {declared} bytes of region data but {available} are available"
            ),
            CorruptReason::OffsetOutOfBounds { offset, len } => {
                write!(f, "offset {offset} escapes buffer of length {len}")
            }
            CorruptReason::BitmapDecode { dictionary_id } => {
                write!(f, "failed to decode posting list for dictionary id {dictionary_id}")
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
