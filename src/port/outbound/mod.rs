//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the collaborators the pipeline drives: the
//! marketplace detail source, the primary record store and the discard
//! side report.

pub mod report;
pub mod source;
pub mod store;
