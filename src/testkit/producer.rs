//! In-memory [`CandidateProducer`] implementations.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::candidate::Candidate;
use crate::error::{Error, Result};
use crate::port::inbound::producer::{CandidateProducer, CandidateSink, Offer};

/// Offers a fixed list of candidates, optionally pausing between them.
///
/// Every [`Offer`] returned by the sink is recorded in order.
pub struct VecProducer {
    candidates: Vec<Candidate>,
    pause: Duration,
    offers: Arc<Mutex<Vec<Offer>>>,
}

impl VecProducer {
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self {
            candidates,
            pause: Duration::ZERO,
            offers: Arc::default(),
        }
    }

    /// Sleep for `pause` before every offer.
    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    /// Shared view of the offers, readable after the producer moved into a run.
    pub fn offers(&self) -> Arc<Mutex<Vec<Offer>>> {
        Arc::clone(&self.offers)
    }
}

#[async_trait]
impl CandidateProducer for VecProducer {
    async fn produce(&mut self, sink: &dyn CandidateSink) -> Result<()> {
        for candidate in std::mem::take(&mut self.candidates) {
            if !self.pause.is_zero() {
                tokio::time::sleep(self.pause).await;
            }
            let offer = sink.offer(candidate).await?;
            self.offers.lock().push(offer);
            if !offer.keep_going() {
                break;
            }
        }
        Ok(())
    }
}

/// Offers its candidates, then fails as if the source table broke.
pub struct FailingProducer {
    candidates: Vec<Candidate>,
    message: String,
}

impl FailingProducer {
    pub fn new(candidates: Vec<Candidate>, message: impl Into<String>) -> Self {
        Self {
            candidates,
            message: message.into(),
        }
    }
}

#[async_trait]
impl CandidateProducer for FailingProducer {
    async fn produce(&mut self, sink: &dyn CandidateSink) -> Result<()> {
        for candidate in std::mem::take(&mut self.candidates) {
            if !sink.offer(candidate).await?.keep_going() {
                return Ok(());
            }
        }
        Err(Error::Parse(self.message.clone()))
    }
}
