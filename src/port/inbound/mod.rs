//! Inbound (driving) ports consumed by inbound adapters.
//!
//! - [`producer`]: the candidate producer contract and the sink it feeds
//! - [`operator`]: operator use-cases the CLI drives

pub mod operator;
pub mod producer;
