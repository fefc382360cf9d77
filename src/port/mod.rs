//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! ```text
//!   CandidateProducer ──▶ CandidateSink ──▶ pipeline ──▶ RecordStore
//!                                              │
//!                                              ├──▶ MarketDetailSource
//!                                              └──▶ DiscardSink
//! ```

pub mod inbound;
pub mod outbound;
