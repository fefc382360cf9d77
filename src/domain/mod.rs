//! Marketplace-agnostic domain types and pure evaluation rules.
//!
//! Nothing in this layer performs I/O or depends on the async runtime.

pub mod batch;
pub mod candidate;
pub mod error;
pub mod evaluation;
pub mod failure;
pub mod market;
pub mod money;
pub mod pricing;
pub mod quote;
pub mod run;
