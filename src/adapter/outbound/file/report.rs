//! JSON discard report.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::info;

use crate::domain::evaluation::DiscardedResult;
use crate::error::Result;
use crate::port::outbound::report::DiscardSink;

/// Writes every discarded result as one pretty-printed JSON array.
///
/// Parent directories are created; an existing report is replaced.
pub struct JsonDiscardReport {
    path: PathBuf,
}

impl JsonDiscardReport {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DiscardSink for JsonDiscardReport {
    async fn write_discarded(&self, records: &[DiscardedResult]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let body = serde_json::to_vec_pretty(records)?;
        tokio::fs::write(&self.path, body).await?;
        info!(path = %self.path.display(), count = records.len(), "Discard report written");
        Ok(())
    }
}
