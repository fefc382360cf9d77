//! Runtime operator implementation.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::signal;
use tracing::{info, warn};

use crate::adapter::outbound::file::candidates::CandidateFile;
use crate::application::pipeline::stop::StopHandle;
use crate::domain::run::RunSummary;
use crate::error::Result;
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::settings::Config;
use crate::port::inbound::operator::runtime::{RunRequest, RunStartupSnapshot, RuntimeOperator};

use super::entry::Operator;

#[async_trait]
impl RuntimeOperator for Operator {
    fn prepare_run(&self, request: &RunRequest) -> Result<RunStartupSnapshot> {
        let config = Self::load_run_config(request)?;
        let storage_label = if request.dry_run {
            "dry run (not persisted)".to_string()
        } else {
            config.storage.database.clone()
        };

        Ok(RunStartupSnapshot {
            profile: config.profile.to_string(),
            candidates: request.candidates.clone(),
            scrape_workers: config.pipeline.effective_scrape_workers(),
            storage_workers: config.pipeline.effective_storage_workers(),
            batch_size: config.pipeline.batch_size,
            limit: config.pipeline.limit,
            storage_label,
            discarded_path: config.report.discarded_path,
        })
    }

    async fn execute_run(&self, request: RunRequest) -> Result<RunSummary> {
        let config = Self::load_run_config(&request)?;
        config.init_logging();
        for warning in config.warnings() {
            warn!(%warning, "Configuration warning");
        }

        let coordinator = bootstrap::build_coordinator(&config, request.dry_run)?;
        info!(
            run_id = coordinator.run_id(),
            profile = %config.profile,
            candidates = %request.candidates,
            "arbscout starting"
        );

        let stop = Arc::new(StopHandle::new());
        let signal_stop = Arc::clone(&stop);
        let interrupt = tokio::spawn(async move {
            if signal::ctrl_c().await.is_ok() {
                info!("Shutdown signal received (Ctrl+C)");
                signal_stop.stop();
            }
        });

        let producer = Box::new(CandidateFile::new(&request.candidates));
        let outcome = coordinator.run(producer, stop.signal()).await;
        interrupt.abort();

        let summary = outcome?;
        info!(
            run_id = %summary.run_id,
            accepted = summary.accepted,
            discarded = summary.discarded_total(),
            cancelled = summary.cancelled,
            "arbscout stopped"
        );
        Ok(summary)
    }
}

impl Operator {
    fn load_run_config(request: &RunRequest) -> Result<Config> {
        let mut config = Config::parse_toml(&request.config_toml)?;
        Self::apply_run_overrides(&mut config, request);
        config.validate()?;
        Ok(config)
    }

    fn apply_run_overrides(config: &mut Config, request: &RunRequest) {
        config.logging = config
            .logging
            .clone()
            .with_overrides(request.log_level.as_deref(), request.json_logs);

        if let Some(limit) = request.limit {
            config.pipeline.limit = Some(limit);
        }

        if let Some(workers) = request.scrape_workers {
            config.pipeline.scrape_workers = workers;
        }

        if let Some(ref database_path) = request.database_path {
            config.storage.database = database_path.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(config_toml: &str) -> RunRequest {
        RunRequest {
            config_toml: config_toml.to_string(),
            candidates: "candidates.jsonl".to_string(),
            log_level: None,
            json_logs: false,
            limit: None,
            scrape_workers: None,
            database_path: None,
            dry_run: false,
        }
    }

    #[test]
    fn overrides_take_precedence_over_the_file() {
        let mut request = request("[pipeline]\nscrape_workers = 2\nlimit = 10\n");
        request.scrape_workers = Some(3);
        request.limit = Some(4);
        request.database_path = Some("override.db".into());

        let snapshot = Operator::new().prepare_run(&request).unwrap();
        assert_eq!(snapshot.scrape_workers, 3);
        assert_eq!(snapshot.limit, Some(4));
        assert_eq!(snapshot.storage_label, "override.db");
    }

    #[test]
    fn worker_override_is_still_validated() {
        let mut request = request("");
        request.scrape_workers = Some(9);
        assert!(Operator::new().prepare_run(&request).is_err());
    }

    #[test]
    fn dry_run_is_labelled() {
        let mut request = request("");
        request.dry_run = true;
        let snapshot = Operator::new().prepare_run(&request).unwrap();
        assert!(snapshot.storage_label.starts_with("dry run"));
    }
}
