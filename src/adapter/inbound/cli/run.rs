//! Handler for the `run` command.

use crate::adapter::inbound::cli::command::RunArgs;
use crate::adapter::inbound::cli::{operator, output, summary};
use crate::error::Result;
use crate::port::inbound::operator::runtime::{RunRequest, RunStartupSnapshot};

/// Execute the run command.
pub async fn execute(args: &RunArgs) -> Result<()> {
    let config_toml = operator::read_config_toml(&args.config)?;
    let machine_output = output::is_json();
    let request = build_run_request(args, config_toml, machine_output);
    let service = operator::operator()?;

    if !output::is_quiet() || machine_output {
        let startup = service.prepare_run(&request)?;
        print_startup_config(&startup);
    }

    let summary = service.execute_run(request).await?;
    summary::render(&summary);
    Ok(())
}

fn build_run_request(args: &RunArgs, config_toml: String, force_json_logs: bool) -> RunRequest {
    RunRequest {
        config_toml,
        candidates: args.candidates.to_string_lossy().to_string(),
        log_level: args.log_level.clone(),
        json_logs: args.json_logs || force_json_logs,
        limit: args.limit,
        scrape_workers: args.scrape_workers,
        database_path: args
            .database
            .as_ref()
            .map(|path| path.to_string_lossy().to_string()),
        dry_run: args.dry_run,
    }
}

fn print_startup_config(snapshot: &RunStartupSnapshot) {
    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Profile", &snapshot.profile);
    output::field("Candidates", &snapshot.candidates);
    output::field(
        "Workers",
        format!(
            "{} scrape, {} storage",
            snapshot.scrape_workers, snapshot.storage_workers
        ),
    );
    if output::verbosity() > 0 {
        output::field("Batch size", snapshot.batch_size);
        output::field("Discards to", &snapshot.discarded_path);
    }
    if let Some(limit) = snapshot.limit {
        output::field("Limit", limit);
    }
    output::field("Storage", &snapshot.storage_label);
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::adapter::inbound::cli::command::{Cli, Commands};

    #[test]
    fn json_output_forces_json_logs() {
        let cli = Cli::try_parse_from([
            "arbscout",
            "run",
            "--candidates",
            "items.jsonl",
            "--database",
            "/tmp/run.db",
        ])
        .unwrap();
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };

        let request = build_run_request(&args, String::new(), true);
        assert!(request.json_logs);
        assert_eq!(request.candidates, "items.jsonl");
        assert_eq!(request.database_path.as_deref(), Some("/tmp/run.db"));
    }
}
