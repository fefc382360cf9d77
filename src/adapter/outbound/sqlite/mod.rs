//! SQLite persistence adapters.
//!
//! Provides the SQLite-backed [`RecordStore`](crate::port::outbound::store::RecordStore)
//! for accepted results using Diesel ORM.

pub mod database;
pub mod store;
