//! Rate/backoff policy and per-source circuit breaker.

pub mod backoff;
pub mod breaker;
pub mod config;
pub mod pacer;
