//! Per-run aggregate produced by the coordinator.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::evaluation::DiscardReason;

/// Discard counts keyed by reason, in a stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DiscardCounts(BTreeMap<DiscardReason, u64>);

impl DiscardCounts {
    pub fn record(&mut self, reason: DiscardReason) {
        self.add(reason, 1);
    }

    pub fn add(&mut self, reason: DiscardReason, count: u64) {
        if count > 0 {
            *self.0.entry(reason).or_insert(0) += count;
        }
    }

    /// Fold another set of counts into this one.
    pub fn merge(&mut self, other: &DiscardCounts) {
        for (reason, count) in other.iter() {
            self.add(reason, count);
        }
    }

    #[must_use]
    pub fn get(&self, reason: DiscardReason) -> u64 {
        self.0.get(&reason).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DiscardReason, u64)> + '_ {
        self.0.iter().map(|(reason, count)| (*reason, *count))
    }
}

/// Read-only summary of a completed pipeline run.
///
/// `seen` counts candidates admitted into the candidate queue; `excluded` and
/// `refused` count candidates the producer offered that never entered it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub elapsed_ms: u64,
    pub seen: u64,
    pub excluded: u64,
    pub refused: u64,
    pub accepted: u64,
    pub discarded: DiscardCounts,
    pub flushes: u64,
    pub persisted: u64,
    pub dropped: u64,
    pub worker_failures: u64,
    pub cancelled: bool,
}

impl RunSummary {
    #[must_use]
    pub fn discarded_total(&self) -> u64 {
        self.discarded.total()
    }

    /// Candidates that reached an outcome.
    #[must_use]
    pub fn evaluated(&self) -> u64 {
        self.accepted + self.discarded_total()
    }

    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        Duration::from_millis(self.elapsed_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_accumulate_per_reason() {
        let mut counts = DiscardCounts::default();
        counts.record(DiscardReason::LowLiquidity);
        counts.record(DiscardReason::LowLiquidity);
        counts.record(DiscardReason::Unprofitable);

        assert_eq!(counts.get(DiscardReason::LowLiquidity), 2);
        assert_eq!(counts.get(DiscardReason::VolatilePrice), 0);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn merge_adds_counts() {
        let mut left = DiscardCounts::default();
        left.record(DiscardReason::ExtractionFailed);
        let mut right = DiscardCounts::default();
        right.add(DiscardReason::ExtractionFailed, 2);
        right.add(DiscardReason::SourceUnavailable, 0);

        left.merge(&right);
        assert_eq!(left.get(DiscardReason::ExtractionFailed), 3);
        assert_eq!(left.iter().count(), 1);
    }

    #[test]
    fn counts_serialize_as_reason_map() {
        let mut counts = DiscardCounts::default();
        counts.record(DiscardReason::VolatilePrice);
        let json = serde_json::to_value(&counts).unwrap();
        assert_eq!(json["volatile_price"], 1);
    }
}
