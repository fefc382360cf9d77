//! File-backed adapters: candidate input, discard report, dry-run store.

pub mod candidates;
pub mod dry_run;
pub mod report;
