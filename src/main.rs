use std::path::Path;
use std::process::ExitCode;

use clap::Parser;

use arbscout::adapter::inbound::cli::command::{Cli, ColorChoice, Commands, ConfigCommand};
use arbscout::adapter::inbound::cli::output::{self, OutputConfig};
use arbscout::adapter::inbound::cli::{config, diagnostic, operator, run};
use arbscout::infrastructure::operator::entry::Operator;

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {}
    }
    output::configure(OutputConfig::new(cli.json, cli.quiet, cli.verbose));

    if operator::install(Box::new(Operator::new())).is_err() {
        output::error("operator already installed");
        return ExitCode::FAILURE;
    }

    let result = match &cli.command {
        Commands::Run(args) => run::execute(args).await,
        Commands::Config(ConfigCommand::Init(args)) => config::execute_init(&args.path, args.force),
        Commands::Config(ConfigCommand::Show(args)) => config::execute_show(&args.config),
        Commands::Config(ConfigCommand::Validate(args)) => config::execute_validate(&args.config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let reported = config_path(&cli.command)
                .is_some_and(|path| !output::is_json() && diagnostic::report_config_error(path, &error));
            if !reported {
                output::error(&error.to_string());
            }
            ExitCode::FAILURE
        }
    }
}

fn config_path(command: &Commands) -> Option<&Path> {
    match command {
        Commands::Run(args) => Some(&args.config),
        Commands::Config(ConfigCommand::Show(args) | ConfigCommand::Validate(args)) => {
            Some(&args.config)
        }
        Commands::Config(ConfigCommand::Init(_)) => None,
    }
}
