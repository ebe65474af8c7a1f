use std::path::Path;

use roaring::RoaringBitmap;

use crate::cancel::CancelCheck;
use crate::dictionary::Dictionary;
use crate::error::Result;
use crate::filter::{self, FilterNode};
use crate::header::Layout;
use crate::mapping::FlatToSource;
use crate::options::ReaderOptions;
use crate::postings::PostingStore;

/// Owns (or borrows) the mapped artifact bytes and the byte region it came
/// from, for the `open_mmap` convenience path. Kept as a private enum so
/// callers only ever see [`Reader`], never which storage mode backs it.
enum Backing<'a> {
    Borrowed(&'a [u8]),
    Owned(memmap2::Mmap),
}

impl<'a> Backing<'a> {
    fn as_bytes(&self) -> &[u8] {
        match self {
            Backing::Borrowed(b) => b,
            Backing::Owned(m) => m,
        }
    }
}

/// The single entry point: construct once from a byte region, then issue
/// any number of concurrent, read-only `matching_doc_ids` queries.
///
/// There is no explicit `Open`/`Closed` state flag. The open/closed model
/// is expressed through ownership instead: a live `&Reader` is open, and
/// `close` consumes `self`, after which the type system makes further
/// queries impossible to express.
pub struct Reader<'a> {
    backing: Backing<'a>,
    num_source_docs: u32,
    options: ReaderOptions,
}

/// Pointers into `backing`'s bytes, borrowed for the reader's lifetime.
/// Kept out of `Reader` itself because they borrow from `backing`, which
/// `Reader` also owns in the `open_mmap` case. [`Reader::new`] and
/// [`Reader::open_mmap`] work around the resulting self-reference by
/// parsing on demand from the stored bytes instead of storing the borrow.
struct Parts<'b> {
    dict: Dictionary<'b>,
    postings: PostingStore<'b>,
    mapping: FlatToSource<'b>,
}

fn parse_parts(bytes: &[u8]) -> Result<Parts<'_>> {
    let layout = Layout::parse(bytes)?;
    let dict = Dictionary::new(layout.dictionary, layout.max_token_length)?;
    let postings = PostingStore::new(layout.postings, dict.len())?;
    let mapping = FlatToSource::new(layout.mapping)?;
    Ok(Parts { dict, postings, mapping })
}

impl<'a> Reader<'a> {
    /// Constructs a reader from an already-mapped (or otherwise owned)
    /// byte region, validating the header and carving the dictionary,
    /// posting, and mapping regions. `num_source_docs` bounds the universe
    /// used for the root-level exclusive complement and is supplied by the
    /// caller because the artifact itself does not restate it
    /// independently of the `flatToSrc` array's contents.
    pub fn new(bytes: &'a [u8], num_source_docs: u32) -> Result<Self> {
        // Validate eagerly so construction fails fast on a corrupt
        // artifact, even though the parsed regions are re-derived per
        // query (see `Parts`' doc comment).
        parse_parts(bytes)?;
        Ok(Reader { backing: Backing::Borrowed(bytes), num_source_docs, options: ReaderOptions::new() })
    }

    /// Convenience constructor that memory-maps `path` read-only and
    /// constructs a `Reader` owning the mapping. For callers that don't
    /// already have a mapping of their own; the borrowed-bytes path in
    /// [`Reader::new`] remains the primary API.
    pub fn open_mmap(path: &Path, num_source_docs: u32) -> Result<Reader<'static>> {
        let file = std::fs::File::open(path)?;
        // SAFETY: the caller guarantees the backing file is not modified
        // concurrently with this mapping's lifetime, the standard
        // precondition for `memmap2::Mmap::map`.
        let mmap = unsafe { memmap2::Mmap::map(&file) }?;
        parse_parts(&mmap)?;
        Ok(Reader { backing: Backing::Owned(mmap), num_source_docs, options: ReaderOptions::new() })
    }

    pub fn with_options(mut self, options: ReaderOptions) -> Self {
        self.options = options;
        self
    }

    /// Resolves `filter` to a bitmap of source doc ids. Re-parses the
    /// header/region layout on every call rather than caching the borrow,
    /// which would otherwise have to be self-referential inside `Reader`.
    /// The parse itself is a handful of bounds-checked slice reads, not
    /// I/O, so the cost is negligible next to the bitmap work it gates.
    pub fn matching_doc_ids(&self, filter: &FilterNode) -> Result<RoaringBitmap> {
        self.matching_doc_ids_cancellable(filter, None)
    }

    /// As [`Reader::matching_doc_ids`], but checks `cancel` between AND/OR
    /// child folds, returning [`crate::Error::Cancelled`] the next time it
    /// reports true.
    pub fn matching_doc_ids_cancellable(
        &self,
        filter: &FilterNode,
        cancel: CancelCheck,
    ) -> Result<RoaringBitmap> {
        let parts = parse_parts(self.backing.as_bytes())?;
        filter::matching_doc_ids(
            &parts.dict,
            &parts.postings,
            &parts.mapping,
            self.num_source_docs,
            filter,
            self.options,
            cancel,
        )
    }

    /// Consumes the reader, releasing its internal references. Does not
    /// free a borrowed byte region, since the caller owns that, but does
    /// drop an owned `memmap2::Mmap` from [`Reader::open_mmap`].
    pub fn close(self) {
        drop(self);
    }
}
