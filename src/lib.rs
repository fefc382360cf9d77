//! arbscout - cross-market arbitrage scouting for tradable virtual goods.
//!
//! Candidates stream from a producer through a bounded pipeline: scrape
//! workers fetch the BUFF buy quote and the Steam sell quote, the evaluator
//! converts currencies, deducts fees and filters on liquidity, volatility and
//! ROI, and storage workers persist accepted results in batches. Every
//! discarded candidate carries a reason and is written to a side report.
//!
//! # Architecture
//!
//! - [`domain`] - Pure types and evaluation rules
//! - [`port`] - Producer, detail source, record store and report contracts
//! - [`application`] - Pacing policy, detail fetcher and the pipeline
//! - [`adapter`] - HTTP source, SQLite store, file producer/report, CLI
//! - [`infrastructure`] - Configuration, wiring and the operator surface
//!
//! # Example
//!
//! ```no_run
//! use arbscout::adapter::outbound::file::candidates::CandidateFile;
//! use arbscout::application::pipeline::stop::StopHandle;
//! use arbscout::infrastructure::bootstrap::build_coordinator;
//! use arbscout::infrastructure::config::settings::Config;
//!
//! # async fn demo() -> arbscout::error::Result<()> {
//! let config = Config::load("config.toml")?;
//! let coordinator = build_coordinator(&config, true)?;
//! let stop = StopHandle::new();
//! let summary = coordinator
//!     .run(Box::new(CandidateFile::new("items.jsonl")), stop.signal())
//!     .await?;
//! println!("{} accepted", summary.accepted);
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
