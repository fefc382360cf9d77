//! Application services: pacing and retry policy, the detail fetcher and the
//! concurrent pipeline that drives them.
//!
//! Depends on domain and ports only; adapters are injected as trait objects.

pub mod fetch;
pub mod pipeline;
pub mod policy;
