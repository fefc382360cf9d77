//! Inbound adapters: the operator-facing surface.

pub mod cli;
