//! Bounded producer/consumer pipeline.
//!
//! ```text
//! producer ─▶ [candidate queue] ─▶ scrape pool ─▶ [result queue] ─▶ storage pool
//!                                                                      │
//!                                                       discard ledger ┘
//! ```

pub mod config;
pub mod coordinator;
pub mod intake;
pub mod ledger;
pub mod queue;
pub mod scrape;
pub mod stop;
pub mod storage;
