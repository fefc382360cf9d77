//! Size-bounded accumulation of accepted results awaiting one flush.

use super::error::DomainError;
use super::evaluation::AcceptedResult;

/// Ordered batch of accepted results.
///
/// Created empty by a storage worker, appended to until full or until the
/// result queue closes, then consumed by [`Batch::into_records`]. A batch is
/// never reused after it is flushed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    capacity: usize,
    records: Vec<AcceptedResult>,
}

impl Batch {
    /// # Errors
    ///
    /// Returns [`DomainError::ZeroBatchCapacity`] when `capacity` is zero.
    pub fn try_new(capacity: usize) -> Result<Self, DomainError> {
        if capacity == 0 {
            return Err(DomainError::ZeroBatchCapacity);
        }
        Ok(Self {
            capacity,
            records: Vec::with_capacity(capacity),
        })
    }

    /// Append a record. Returns `true` once the batch has reached capacity.
    pub fn push(&mut self, record: AcceptedResult) -> bool {
        self.records.push(record);
        self.is_full()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.records.len() >= self.capacity
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn records(&self) -> &[AcceptedResult] {
        &self.records
    }

    /// Consume the batch, yielding its records in insertion order.
    #[must_use]
    pub fn into_records(self) -> Vec<AcceptedResult> {
        self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::candidate::Candidate;
    use crate::domain::evaluation::Fees;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn record(n: usize) -> AcceptedResult {
        let candidate =
            Candidate::try_new(format!("Item {n}"), None, false, "b", "s").unwrap();
        AcceptedResult::compute(
            candidate,
            dec!(10),
            dec!(20),
            Fees {
                buy: dec!(0.025),
                sell: dec!(0.13),
            },
            (50, 50),
            Utc::now(),
        )
    }

    #[test]
    fn zero_capacity_is_rejected() {
        assert_eq!(Batch::try_new(0), Err(DomainError::ZeroBatchCapacity));
    }

    #[test]
    fn push_reports_full_at_capacity() {
        let mut batch = Batch::try_new(2).unwrap();
        assert!(batch.is_empty());
        assert!(!batch.push(record(1)));
        assert!(batch.push(record(2)));
        assert!(batch.is_full());
        assert_eq!(batch.len(), 2);
    }

    #[test]
    fn into_records_keeps_insertion_order() {
        let mut batch = Batch::try_new(3).unwrap();
        batch.push(record(1));
        batch.push(record(2));
        let names: Vec<_> = batch
            .into_records()
            .iter()
            .map(|r| r.candidate().name().to_string())
            .collect();
        assert_eq!(names, ["Item 1", "Item 2"]);
    }
}
