//! Record store that only logs, for `--dry-run`.

use async_trait::async_trait;
use tracing::info;

use crate::domain::evaluation::AcceptedResult;
use crate::error::Result;
use crate::port::outbound::store::RecordStore;

/// Logs each accepted result instead of persisting it.
#[derive(Debug, Default)]
pub struct LoggingRecordStore;

#[async_trait]
impl RecordStore for LoggingRecordStore {
    async fn insert_batch(&self, records: &[AcceptedResult]) -> Result<usize> {
        for record in records {
            info!(
                candidate = %record.candidate(),
                profit = %record.profit().round_dp(2),
                roi_pct = %record.roi_pct().round_dp(2),
                "Dry run, not persisting"
            );
        }
        Ok(records.len())
    }
}
