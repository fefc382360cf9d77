//! Outbound adapters (driven side).

pub mod file;
pub mod http;
pub mod sqlite;
