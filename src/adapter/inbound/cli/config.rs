//! Handler for the `config` command group.

use std::fs;
use std::path::Path;

use serde_json::json;

use crate::adapter::inbound::cli::{operator, output};
use crate::error::{ConfigError, Result};

/// Default config template with documentation.
const CONFIG_TEMPLATE: &str = include_str!("../../../../config.toml.example");

/// Execute `config init`.
pub fn execute_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(ConfigError::InvalidValue {
            field: "config",
            reason: "file already exists (use --force to overwrite)".to_string(),
        }
        .into());
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, CONFIG_TEMPLATE)?;
    output::section("Config Initialized");
    output::success("Created configuration file");
    output::field("Path", path.display());
    output::section("Next Steps");
    output::note(&format!("1. Edit {} with your settings", path.display()));
    output::note(&format!(
        "2. Run: arbscout config validate -c {}",
        path.display()
    ));
    output::note(&format!(
        "3. Run: arbscout run -c {} --candidates items.jsonl",
        path.display()
    ));
    Ok(())
}

/// Execute `config show`.
pub fn execute_show(path: &Path) -> Result<()> {
    let config_toml = operator::read_config_toml(path)?;
    let config = operator::operator()?.show_config(&config_toml)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "config.show",
            "path": path.display().to_string(),
            "profile": config.profile,
            "pipeline": {
                "scrape_workers": config.scrape_workers,
                "storage_workers": config.storage_workers,
                "batch_size": config.batch_size,
                "candidate_queue_capacity": config.queue_capacities.0,
                "result_queue_capacity": config.queue_capacities.1,
                "flush_failure": config.flush_failure,
                "limit": config.limit,
                "exclude_prefixes": config.exclude_prefixes,
            },
            "pacing": config.pacing.iter().map(|p| json!({
                "market": p.market,
                "min_delay_ms": p.min_delay_ms,
                "jitter_ms": p.jitter_ms,
            })).collect::<Vec<_>>(),
            "breaker_threshold": config.breaker_threshold,
            "database": config.database,
            "discarded_path": config.discarded_path,
        }));
        return Ok(());
    }

    output::section("Effective Configuration");
    output::field("Profile", &config.profile);

    output::section("Pipeline");
    output::field(
        "Workers",
        format!(
            "{} scrape, {} storage",
            config.scrape_workers, config.storage_workers
        ),
    );
    output::field("Batch size", config.batch_size);
    output::field(
        "Queues",
        format!(
            "{} candidates, {} results",
            config.queue_capacities.0, config.queue_capacities.1
        ),
    );
    output::field("Flush failure", &config.flush_failure);
    match config.limit {
        Some(limit) => output::field("Limit", limit),
        None => output::field("Limit", "none"),
    }
    if !config.exclude_prefixes.is_empty() {
        output::field("Excluded", config.exclude_prefixes.join(", "));
    }

    output::section("Pacing");
    output::field("Max attempts", config.max_attempts);
    for pacing in &config.pacing {
        output::field(
            &pacing.market,
            format!("{}ms + up to {}ms jitter", pacing.min_delay_ms, pacing.jitter_ms),
        );
    }
    output::field("Breaker", format!("{} failures", config.breaker_threshold));

    output::section("Evaluation");
    output::field("Exchange rate", &config.exchange_rate);
    output::field("Fees", format!("buy {}, sell {}", config.fees.0, config.fees.1));
    output::field("Min listings", config.min_listings);
    output::field("Min ROI", format!("{}%", config.min_roi_pct));

    output::section("Storage");
    output::field("Database", &config.database);
    output::field("Discards", &config.discarded_path);
    output::field("BUFF", &config.source_urls.0);
    output::field("Steam", &config.source_urls.1);

    if output::verbosity() > 0 {
        output::section("Effective TOML");
        output::lines(&config.toml);
    }

    Ok(())
}

/// Execute `config validate`.
pub fn execute_validate(path: &Path) -> Result<()> {
    output::section("Config Validation");
    output::field("Path", path.display());
    let config_toml = operator::read_config_toml(path)?;
    let validation = operator::operator()?.validate_config(&config_toml)?;
    output::success("Config file is valid");

    if !validation.warnings.is_empty() {
        output::section("Warnings");
        for warning in &validation.warnings {
            output::warning(warning);
        }
    }

    output::field(
        "Next",
        format!("arbscout config show -c {}", path.display()),
    );
    Ok(())
}
