//! Configuration operator implementation.

use crate::domain::market::Marketplace;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::port::inbound::operator::configuration::{
    ConfigPacing, ConfigValidationReport, ConfigView, ConfigurationOperator,
};

use super::entry::Operator;

impl ConfigurationOperator for Operator {
    fn show_config(&self, config_toml: &str) -> Result<ConfigView> {
        let config = Config::parse_toml(config_toml)?;
        let toml = config.to_toml()?;
        let pipeline = &config.pipeline;

        Ok(ConfigView {
            profile: config.profile.to_string(),
            scrape_workers: pipeline.effective_scrape_workers(),
            storage_workers: pipeline.effective_storage_workers(),
            batch_size: pipeline.batch_size,
            queue_capacities: (
                pipeline.candidate_queue_capacity,
                pipeline.result_queue_capacity,
            ),
            flush_failure: format!("{:?}", pipeline.flush_failure).to_lowercase(),
            limit: pipeline.limit,
            exclude_prefixes: pipeline.exclude_prefixes.clone(),
            max_attempts: config.pacing.max_attempts,
            pacing: Marketplace::ALL
                .into_iter()
                .map(|market| {
                    let pacing = config.pacing.for_market(market);
                    ConfigPacing {
                        market: market.to_string(),
                        min_delay_ms: pacing.min_delay_ms,
                        jitter_ms: pacing.jitter_ms,
                    }
                })
                .collect(),
            breaker_threshold: config.breaker.failure_threshold,
            exchange_rate: config.evaluation.exchange_rate.to_string(),
            fees: (
                config.evaluation.buy_fee_rate.to_string(),
                config.evaluation.sell_fee_rate.to_string(),
            ),
            min_listings: config.evaluation.min_listings,
            min_roi_pct: config.evaluation.min_roi_pct.to_string(),
            database: config.storage.database.clone(),
            discarded_path: config.report.discarded_path.clone(),
            source_urls: (
                config.sources.buff_base_url.clone(),
                config.sources.steam_base_url.clone(),
            ),
            toml,
        })
    }

    fn validate_config(&self, config_toml: &str) -> Result<ConfigValidationReport> {
        let config = Config::parse_toml(config_toml)?;
        Ok(ConfigValidationReport {
            warnings: config.warnings(),
        })
    }
}
