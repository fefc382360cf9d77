//! HTTP marketplace detail source.
//!
//! Talks to a JSON detail service (typically a headless-browser sidecar that
//! owns the marketplace sessions) and classifies every failure into a
//! [`FailureKind`](crate::domain::failure::FailureKind).

pub mod client;
pub mod settings;
