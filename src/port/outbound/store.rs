//! Persistence port for accepted results.

use async_trait::async_trait;

use crate::domain::evaluation::AcceptedResult;
use crate::error::Result;

/// Primary store for accepted results.
///
/// Implementations must tolerate partially duplicated inserts without
/// corrupting history; every call is an independent append.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Persist one batch. Returns the number of rows written.
    async fn insert_batch(&self, records: &[AcceptedResult]) -> Result<usize>;
}
