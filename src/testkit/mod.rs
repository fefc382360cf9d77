//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`source`] - Scripted [`MarketDetailSource`](crate::port::outbound::source::MarketDetailSource)
//!   with per-candidate responses, latency and call counters.
//! - [`store`] - Recording record store and discard sink with injectable failures.
//! - [`producer`] - Candidate producers: a fixed list and one that fails midway.
//! - [`domain`] - Builders for candidates, raw details and results.
//! - [`config`] - Canonical fast test configurations.

pub mod config;
pub mod domain;
pub mod producer;
pub mod source;
pub mod store;
