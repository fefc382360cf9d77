//! Detail fetcher: paced, retried, concurrent fetch of both marketplace
//! quotes for one candidate.

pub mod error;
pub mod fetcher;
pub mod normalize;
