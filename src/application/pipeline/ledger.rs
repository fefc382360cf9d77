//! Run-scoped collection of discarded results for the side report.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::domain::evaluation::DiscardedResult;

/// Shared, append-only list of discards, drained once at run end.
#[derive(Debug, Clone, Default)]
pub struct DiscardLedger {
    entries: Arc<Mutex<Vec<DiscardedResult>>>,
}

impl DiscardLedger {
    pub fn push(&self, discarded: DiscardedResult) {
        self.entries.lock().push(discarded);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Take every entry, leaving the ledger empty.
    #[must_use]
    pub fn take(&self) -> Vec<DiscardedResult> {
        std::mem::take(&mut *self.entries.lock())
    }
}
