//! Side-report port for discarded results.

use async_trait::async_trait;

use crate::domain::evaluation::DiscardedResult;
use crate::error::Result;

/// Receives every discarded result once, at the end of a run.
///
/// Discards never reach the primary store.
#[async_trait]
pub trait DiscardSink: Send + Sync {
    async fn write_discarded(&self, records: &[DiscardedResult]) -> Result<()>;
}
