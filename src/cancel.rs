/// A caller-supplied cancellation check, threaded through AND/OR fan-in and
/// polled after each child's result is folded in. `None` means the query is
/// never cancellable.
pub type CancelCheck<'a> = Option<&'a dyn Fn() -> bool>;

/// Counts folds and reports whether this fold should check for
/// cancellation, per [`crate::options::ReaderOptions::cancel_every`].
pub(crate) struct CancelGate<'a> {
    check: CancelCheck<'a>,
    every: usize,
    folds: usize,
}

impl<'a> CancelGate<'a> {
    pub fn new(check: CancelCheck<'a>, every: usize) -> Self {
        CancelGate { check, every: every.max(1), folds: 0 }
    }

    /// Call once per child fold inside AND/OR. Returns `true` if the
    /// caller's check fired and the query should abort.
    pub fn tick(&mut self) -> bool {
        self.folds += 1;
        if self.folds % self.every != 0 {
            return false;
        }
        match self.check {
            Some(f) => f(),
            None => false,
        }
    }
}
