//! Producer-facing sink feeding the candidate queue.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::queue::{QueueSender, SendError};
use super::stop::StopSignal;
use crate::domain::candidate::Candidate;
use crate::error::{Error, Result};
use crate::port::inbound::producer::{CandidateSink, Offer};

/// Admission rules applied before a candidate enters the queue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntakeFilter {
    pub exclude_prefixes: Vec<String>,
    pub limit: Option<u64>,
}

impl IntakeFilter {
    #[must_use]
    pub fn is_excluded(&self, candidate: &Candidate) -> bool {
        self.exclude_prefixes
            .iter()
            .any(|prefix| candidate.name().starts_with(prefix.as_str()))
    }
}

/// Counters the coordinator reads once the producer is done.
#[derive(Debug, Default)]
pub struct IntakeCounters {
    seen: AtomicU64,
    excluded: AtomicU64,
    refused: AtomicU64,
}

impl IntakeCounters {
    #[must_use]
    pub fn seen(&self) -> u64 {
        self.seen.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn excluded(&self) -> u64 {
        self.excluded.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn refused(&self) -> u64 {
        self.refused.load(Ordering::Acquire)
    }
}

/// [`CandidateSink`] backed by the candidate queue.
///
/// Owns a sender; the queue closes for the scrape pool when the sink drops.
pub struct QueueSink {
    sender: QueueSender<Candidate>,
    filter: IntakeFilter,
    counters: Arc<IntakeCounters>,
    stop: StopSignal,
}

impl QueueSink {
    #[must_use]
    pub fn new(
        sender: QueueSender<Candidate>,
        filter: IntakeFilter,
        counters: Arc<IntakeCounters>,
        stop: StopSignal,
    ) -> Self {
        Self {
            sender,
            filter,
            counters,
            stop,
        }
    }

    /// Reserve one admission under the limit.
    fn admit(&self) -> bool {
        match self.filter.limit {
            None => {
                self.counters.seen.fetch_add(1, Ordering::AcqRel);
                true
            }
            Some(limit) => self
                .counters
                .seen
                .fetch_update(Ordering::AcqRel, Ordering::Acquire, |seen| {
                    (seen < limit).then_some(seen + 1)
                })
                .is_ok(),
        }
    }
}

#[async_trait]
impl CandidateSink for QueueSink {
    async fn offer(&self, candidate: Candidate) -> Result<Offer> {
        if self.stop.is_stopped() {
            return Ok(Offer::Stopped);
        }
        if self.filter.is_excluded(&candidate) {
            self.counters.excluded.fetch_add(1, Ordering::AcqRel);
            debug!(candidate = %candidate, "Candidate excluded by prefix filter");
            return Ok(Offer::Excluded);
        }
        if !self.admit() {
            self.counters.refused.fetch_add(1, Ordering::AcqRel);
            return Ok(Offer::Refused);
        }

        match self.sender.send(candidate, &self.stop).await {
            Ok(()) => Ok(Offer::Accepted),
            Err(err) => {
                self.counters.seen.fetch_sub(1, Ordering::AcqRel);
                match err {
                    SendError::Stopped(_) => Ok(Offer::Stopped),
                    SendError::Closed(_) => Err(Error::QueueClosed("candidate")),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::pipeline::queue::{bounded, QueueReceiver};
    use crate::application::pipeline::stop::StopHandle;
    use crate::testkit::domain;

    fn sink(limit: Option<u64>) -> (QueueSink, Arc<IntakeCounters>, QueueReceiver<Candidate>) {
        let (tx, rx) = bounded(8);
        let counters = Arc::new(IntakeCounters::default());
        let filter = IntakeFilter {
            exclude_prefixes: vec!["Charm |".into()],
            limit,
        };
        (
            QueueSink::new(tx, filter, Arc::clone(&counters), StopSignal::never()),
            counters,
            rx,
        )
    }

    #[tokio::test]
    async fn excluded_prefixes_never_enter_the_queue() {
        let (sink, counters, rx) = sink(None);
        let offer = sink.offer(domain::candidate("Charm | Die-cast")).await.unwrap();
        assert_eq!(offer, Offer::Excluded);
        let offer = sink.offer(domain::candidate("AK-47 | Slate")).await.unwrap();
        assert_eq!(offer, Offer::Accepted);
        drop(sink);

        assert_eq!(rx.recv().await.unwrap().name(), "AK-47 | Slate");
        assert_eq!(rx.recv().await, None);
        assert_eq!(counters.seen(), 1);
        assert_eq!(counters.excluded(), 1);
    }

    #[tokio::test]
    async fn limit_refuses_extra_candidates() {
        let (sink, counters, _rx) = sink(Some(2));
        for n in 0..2 {
            let offer = sink.offer(domain::candidate(&format!("Item {n}"))).await.unwrap();
            assert!(offer.keep_going());
        }
        let offer = sink.offer(domain::candidate("Item 2")).await.unwrap();
        assert_eq!(offer, Offer::Refused);
        assert!(!offer.keep_going());
        assert_eq!(counters.seen(), 2);
        assert_eq!(counters.refused(), 1);
    }

    #[tokio::test]
    async fn stopped_sink_does_not_count() {
        let (tx, _rx) = bounded(1);
        let handle = StopHandle::new();
        let counters = Arc::new(IntakeCounters::default());
        let sink = QueueSink::new(
            tx,
            IntakeFilter::default(),
            Arc::clone(&counters),
            handle.signal(),
        );
        handle.stop();

        let offer = sink.offer(domain::candidate("Item")).await.unwrap();
        assert_eq!(offer, Offer::Stopped);
        assert_eq!(counters.seen(), 0);
    }

    #[tokio::test]
    async fn closed_queue_is_an_error() {
        let (tx, rx) = bounded(1);
        drop(rx);
        let sink = QueueSink::new(
            tx,
            IntakeFilter::default(),
            Arc::new(IntakeCounters::default()),
            StopSignal::never(),
        );
        let err = sink.offer(domain::candidate("Item")).await.unwrap_err();
        assert!(matches!(err, Error::QueueClosed("candidate")));
    }
}
