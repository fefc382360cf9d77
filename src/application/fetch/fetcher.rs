//! Concurrent two-source detail fetch with pacing, retry and breaker.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::error::FetchError;
use super::normalize::{normalize, QuoteShape};
use crate::application::pipeline::stop::StopSignal;
use crate::application::policy::backoff::BackoffPolicy;
use crate::application::policy::breaker::CircuitBreaker;
use crate::application::policy::config::PacingConfig;
use crate::application::policy::pacer::Pacer;
use crate::domain::candidate::Candidate;
use crate::domain::market::Marketplace;
use crate::domain::quote::MarketQuote;
use crate::port::outbound::source::{MarketDetailSource, SourceError};

/// Fetch-side settings threaded from configuration.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// Upper bound on a single physical request.
    pub timeout: Duration,
    /// Listing count required on both sides.
    pub min_listings: u32,
    pub shape: QuoteShape,
    pub pacing: PacingConfig,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
            min_listings: 40,
            shape: QuoteShape::default(),
            pacing: PacingConfig::default(),
        }
    }
}

/// Fetches and normalizes both marketplace quotes for a candidate.
///
/// Holds one [`Pacer`] per marketplace; the [`CircuitBreaker`] is shared with
/// every other fetcher user in the run.
pub struct DetailFetcher {
    source: Arc<dyn MarketDetailSource>,
    breaker: Arc<CircuitBreaker>,
    policy: BackoffPolicy,
    pacers: [Pacer; 2],
    settings: FetchSettings,
}

impl DetailFetcher {
    #[must_use]
    pub fn new(
        source: Arc<dyn MarketDetailSource>,
        breaker: Arc<CircuitBreaker>,
        settings: FetchSettings,
    ) -> Self {
        Self {
            source,
            breaker,
            policy: BackoffPolicy::new(&settings.pacing),
            pacers: [Pacer::new(), Pacer::new()],
            settings,
        }
    }

    #[must_use]
    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    /// Fetch both quotes concurrently.
    ///
    /// Nothing is requested while either marketplace's breaker is open.
    /// Otherwise waits for both sides to succeed or exhaust their retries.
    /// Cancellation takes precedence over other failures, then an unavailable
    /// source, then the buy side's failure over the sell side's.
    ///
    /// # Errors
    ///
    /// Returns the [`FetchError`] of the failing side, or
    /// [`FetchError::LowLiquidity`] when both succeed but either side lists
    /// fewer than the configured minimum.
    pub async fn fetch(
        &self,
        candidate: &Candidate,
        stop: &StopSignal,
    ) -> Result<(MarketQuote, MarketQuote), FetchError> {
        if let Some(market) = Marketplace::ALL
            .into_iter()
            .find(|&market| self.breaker.is_open(market))
        {
            return Err(FetchError::SourceUnavailable { market });
        }

        let (buff, steam) = tokio::join!(
            self.fetch_one(Marketplace::Buff, candidate, stop),
            self.fetch_one(Marketplace::Steam, candidate, stop),
        );

        let (buff, steam) = settle(buff, steam)?;

        for quote in [&buff, &steam] {
            if quote.listing_count() < self.settings.min_listings {
                return Err(FetchError::LowLiquidity {
                    market: quote.market(),
                    listings: quote.listing_count(),
                    minimum: self.settings.min_listings,
                });
            }
        }

        Ok((buff, steam))
    }

    async fn fetch_one(
        &self,
        market: Marketplace,
        candidate: &Candidate,
        stop: &StopSignal,
    ) -> Result<MarketQuote, FetchError> {
        let pacing = self.settings.pacing.for_market(market);
        let pacer = &self.pacers[market.index()];
        let locator = candidate.locator(market);
        let mut attempt = 0u32;

        loop {
            if self.breaker.is_open(market) {
                return Err(FetchError::SourceUnavailable { market });
            }

            let mut guard = pacer
                .acquire(self.policy.next_delay(0, pacing), stop)
                .await
                .map_err(|_| FetchError::Cancelled)?;
            attempt += 1;

            let outcome = tokio::select! {
                biased;
                () = stop.cancelled() => return Err(FetchError::Cancelled),
                outcome = tokio::time::timeout(
                    self.settings.timeout,
                    self.source.fetch_market_detail(market, locator),
                ) => outcome,
            };

            let err = match outcome {
                Ok(Ok(raw)) => {
                    drop(guard);
                    // A parseable answer or not, the source responded.
                    self.breaker.record_success(market);
                    return normalize(market, &raw, self.settings.shape)
                        .map_err(|err| FetchError::from_source(market, attempt, &err));
                }
                Ok(Err(err)) => err,
                Err(_) => SourceError::timeout(format!(
                    "no response within {} ms",
                    self.settings.timeout.as_millis()
                )),
            };

            if err.kind().is_structural() {
                self.breaker.record_success(market);
                return Err(FetchError::from_source(market, attempt, &err));
            }

            if !self.policy.should_retry(attempt, err.kind()) {
                self.breaker.record_failure(market);
                warn!(
                    candidate = %candidate,
                    market = %market,
                    attempt,
                    error = %err,
                    "Retries exhausted"
                );
                return Err(FetchError::from_source(market, attempt, &err));
            }

            let backoff = self.policy.next_delay(attempt, pacing);
            debug!(
                candidate = %candidate,
                market = %market,
                attempt,
                backoff_ms = backoff.as_millis() as u64,
                error = %err,
                "Transient failure, retry scheduled"
            );
            guard.extend(backoff);
        }
    }
}

fn settle(
    buff: Result<MarketQuote, FetchError>,
    steam: Result<MarketQuote, FetchError>,
) -> Result<(MarketQuote, MarketQuote), FetchError> {
    match (buff, steam) {
        (Ok(buff), Ok(steam)) => Ok((buff, steam)),
        (Err(FetchError::Cancelled), _) | (_, Err(FetchError::Cancelled)) => {
            Err(FetchError::Cancelled)
        }
        (Err(err @ FetchError::SourceUnavailable { .. }), _)
        | (_, Err(err @ FetchError::SourceUnavailable { .. })) => Err(err),
        (Err(err), _) | (_, Err(err)) => Err(err),
    }
}
