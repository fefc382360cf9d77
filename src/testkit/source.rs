//! Scripted [`MarketDetailSource`] for testing.
//!
//! Responses are registered per candidate and marketplace and consumed in
//! order; the last response repeats once the script is down to one. Locators
//! without a script fall back to a per-marketplace default, and to
//! `element_not_found` when none is set.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::domain::detail;
use crate::domain::candidate::Candidate;
use crate::domain::market::Marketplace;
use crate::port::outbound::source::{MarketDetailSource, RawDetail, SourceError};

type Response = Result<RawDetail, SourceError>;

/// In-memory detail source with scripted responses.
#[derive(Default)]
pub struct ScriptedSource {
    scripts: Mutex<HashMap<(Marketplace, String), VecDeque<Response>>>,
    defaults: Mutex<[Option<Response>; 2]>,
    latency: Duration,
    calls: [AtomicUsize; 2],
    in_flight: [AtomicUsize; 2],
    peak_in_flight: [AtomicUsize; 2],
    locator_calls: Mutex<HashMap<String, usize>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every response by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Script the responses for one candidate on one marketplace.
    pub fn respond(&self, candidate: &Candidate, market: Marketplace, responses: Vec<Response>) {
        self.scripts
            .lock()
            .insert((market, candidate.locator(market).to_string()), responses.into());
    }

    /// Script a single successful detail on each side.
    pub fn respond_ok(&self, candidate: &Candidate, buff: RawDetail, steam: RawDetail) {
        self.respond(candidate, Marketplace::Buff, vec![Ok(buff)]);
        self.respond(candidate, Marketplace::Steam, vec![Ok(steam)]);
    }

    /// Script details that evaluate as accepted under the default rules.
    pub fn respond_profitable(&self, candidate: &Candidate) {
        self.respond_ok(candidate, detail(100, 80), detail(150, 90));
    }

    /// Response for every unscripted locator on `market`.
    pub fn respond_default(&self, market: Marketplace, response: Response) {
        self.defaults.lock()[market.index()] = Some(response);
    }

    /// Physical calls made against `market`.
    pub fn calls(&self, market: Marketplace) -> usize {
        self.calls[market.index()].load(Ordering::SeqCst)
    }

    /// Calls made for one candidate on one marketplace.
    pub fn calls_for(&self, candidate: &Candidate, market: Marketplace) -> usize {
        self.locator_calls
            .lock()
            .get(candidate.locator(market))
            .copied()
            .unwrap_or(0)
    }

    /// Highest number of concurrent calls observed against `market`.
    pub fn peak_in_flight(&self, market: Marketplace) -> usize {
        self.peak_in_flight[market.index()].load(Ordering::SeqCst)
    }

    fn next_response(&self, market: Marketplace, locator: &str) -> Response {
        let mut scripts = self.scripts.lock();
        if let Some(script) = scripts.get_mut(&(market, locator.to_string())) {
            let next = if script.len() > 1 {
                script.pop_front()
            } else {
                script.front().cloned()
            };
            if let Some(response) = next {
                return response;
            }
        }
        drop(scripts);

        self.defaults.lock()[market.index()]
            .clone()
            .unwrap_or_else(|| {
                Err(SourceError::element_not_found(format!(
                    "no scripted response for {locator}"
                )))
            })
    }
}

#[async_trait]
impl MarketDetailSource for ScriptedSource {
    async fn fetch_market_detail(&self, market: Marketplace, locator: &str) -> Response {
        let slot = market.index();
        self.calls[slot].fetch_add(1, Ordering::SeqCst);
        *self.locator_calls.lock().entry(locator.to_string()).or_insert(0) += 1;

        let current = self.in_flight[slot].fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight[slot].fetch_max(current, Ordering::SeqCst);
        let _gauge = InFlight(&self.in_flight[slot]);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.next_response(market, locator)
    }
}

/// Decrements the in-flight gauge when the call ends or is dropped.
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::domain::candidate;

    #[tokio::test]
    async fn last_response_repeats() {
        let source = ScriptedSource::new();
        let item = candidate("AK-47 | Redline");
        source.respond(
            &item,
            Marketplace::Buff,
            vec![Err(SourceError::timeout("slow")), Ok(detail(100, 80))],
        );

        let locator = item.locator(Marketplace::Buff);
        assert!(source.fetch_market_detail(Marketplace::Buff, locator).await.is_err());
        assert!(source.fetch_market_detail(Marketplace::Buff, locator).await.is_ok());
        assert!(source.fetch_market_detail(Marketplace::Buff, locator).await.is_ok());
        assert_eq!(source.calls_for(&item, Marketplace::Buff), 3);
    }

    #[tokio::test]
    async fn unscripted_locators_use_the_default() {
        let source = ScriptedSource::new();
        assert!(source
            .fetch_market_detail(Marketplace::Steam, "steam/unknown")
            .await
            .is_err());

        source.respond_default(Marketplace::Steam, Ok(detail(10, 50)));
        assert!(source
            .fetch_market_detail(Marketplace::Steam, "steam/unknown")
            .await
            .is_ok());
        assert_eq!(source.calls(Marketplace::Steam), 2);
    }
}
