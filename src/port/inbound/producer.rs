//! Candidate producer contract.
//!
//! Table extraction lives outside the pipeline. Whatever discovers candidates
//! implements [`CandidateProducer`] and streams rows into the
//! [`CandidateSink`] it is handed; the total count is unknown until the
//! producer returns.

use async_trait::async_trait;

use crate::domain::candidate::Candidate;
use crate::error::Result;

/// What happened to an offered candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offer {
    /// Enqueued for scraping.
    Accepted,
    /// Dropped by an exclusion filter; keep producing.
    Excluded,
    /// The run's candidate limit is reached; stop producing.
    Refused,
    /// The run is stopping; stop producing.
    Stopped,
}

impl Offer {
    /// Whether the producer should keep offering candidates.
    #[must_use]
    pub const fn keep_going(self) -> bool {
        matches!(self, Self::Accepted | Self::Excluded)
    }
}

/// Entry point into the candidate queue.
#[async_trait]
pub trait CandidateSink: Send + Sync {
    /// Offer one candidate, waiting while the queue is full.
    ///
    /// # Errors
    ///
    /// Fails when the queue closed underneath the producer.
    async fn offer(&self, candidate: Candidate) -> Result<Offer>;
}

/// Streams candidates into the pipeline.
#[async_trait]
pub trait CandidateProducer: Send {
    /// Produce until exhausted or until [`Offer::keep_going`] turns false.
    ///
    /// An error is fatal to the run.
    async fn produce(&mut self, sink: &dyn CandidateSink) -> Result<()>;
}
