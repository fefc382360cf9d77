//! Composition root: builds a ready-to-run coordinator from configuration.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use uuid::Uuid;

use crate::adapter::outbound::file::dry_run::LoggingRecordStore;
use crate::adapter::outbound::file::report::JsonDiscardReport;
use crate::adapter::outbound::http::client::HttpDetailSource;
use crate::adapter::outbound::sqlite::database::connection::{create_pool, run_migrations};
use crate::adapter::outbound::sqlite::store::SqliteRecordStore;
use crate::application::fetch::fetcher::{DetailFetcher, FetchSettings};
use crate::application::pipeline::coordinator::{Coordinator, PipelineParts};
use crate::application::policy::breaker::CircuitBreaker;
use crate::domain::evaluation::Evaluator;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::source::MarketDetailSource;
use crate::port::outbound::store::RecordStore;

/// Build the detail fetcher: HTTP source, shared breaker and pacing.
pub(crate) fn build_fetcher(config: &Config) -> Result<DetailFetcher> {
    let timeout = Duration::from_millis(config.pipeline.fetch_timeout_ms);
    let source: Arc<dyn MarketDetailSource> =
        Arc::new(HttpDetailSource::new(&config.sources, timeout)?);
    let breaker = Arc::new(CircuitBreaker::new(config.breaker));
    Ok(DetailFetcher::new(
        source,
        breaker,
        FetchSettings {
            timeout,
            min_listings: config.evaluation.min_listings,
            shape: config.evaluation.shape(),
            pacing: config.pacing.clone(),
        },
    ))
}

/// Build the record store: SQLite, or a logging stand-in for dry runs.
pub(crate) fn build_record_store(
    config: &Config,
    run_id: &str,
    dry_run: bool,
) -> Result<Arc<dyn RecordStore>> {
    if dry_run {
        info!("Dry run, accepted results will not be persisted");
        return Ok(Arc::new(LoggingRecordStore));
    }

    let pool = create_pool(&config.storage.database, config.storage.pool_size)?;
    run_migrations(&pool)?;
    info!(database = %config.storage.database, "Database ready");
    let write_deadline = Duration::from_millis(config.pipeline.flush_timeout_ms);
    Ok(Arc::new(
        SqliteRecordStore::new(pool, run_id).with_write_deadline(write_deadline),
    ))
}

/// Wire every adapter into a [`Coordinator`].
pub fn build_coordinator(config: &Config, dry_run: bool) -> Result<Coordinator> {
    let run_id = Uuid::new_v4().to_string();
    let evaluator = Evaluator::new(config.evaluation.rules()?);
    let parts = PipelineParts {
        fetcher: Arc::new(build_fetcher(config)?),
        evaluator: Arc::new(evaluator),
        store: build_record_store(config, &run_id, dry_run)?,
        discards: Arc::new(JsonDiscardReport::new(&config.report.discarded_path)),
    };
    Ok(Coordinator::new(config.pipeline.clone(), parts).with_run_id(run_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_database(path: &std::path::Path) -> Config {
        let mut config = Config::default();
        config.storage.database = path.display().to_string();
        config.report.discarded_path = path.with_extension("json").display().to_string();
        config
    }

    #[test]
    fn dry_run_does_not_touch_the_database() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("missing").join("arbscout.db");
        let config = config_with_database(&db);

        build_coordinator(&config, true).unwrap();
        assert!(!db.exists());
    }

    #[test]
    fn persistent_run_migrates_the_database() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("arbscout.db");
        let config = config_with_database(&db);

        let coordinator = build_coordinator(&config, false).unwrap();
        assert!(db.exists());
        assert!(Uuid::parse_str(coordinator.run_id()).is_ok());
    }
}
