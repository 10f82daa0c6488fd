//! FailureSense Control - CLI client for the FailureSense prediction service
//!
//! Collects a telemetry reading, submits it, and renders the risk assessment.

use anyhow::Result;
use clap::Parser;
use tracing::error;

use failuresensectl::assessor::Assessor;
use failuresensectl::cli::{Cli, Commands};
use failuresensectl::config::ClientConfig;
use failuresensectl::errors::EXIT_GENERAL_ERROR;
use failuresensectl::output::Renderer;
use failuresensectl::service::HttpPredictionService;
use failuresensectl::{commands, interactive, logging};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("[ERROR] {:#}", e);
            EXIT_GENERAL_ERROR
        }
    };
    std::process::exit(code);
}

async fn run(cli: Cli) -> Result<i32> {
    let mut config = ClientConfig::load()?;
    cli.apply_overrides(&mut config)?;
    let renderer = Renderer::from_config(&config.output);

    match &cli.command {
        Commands::Assess(args) => commands::assess(&config, renderer, args).await,
        Commands::Interactive => {
            let assessor = Assessor::new(HttpPredictionService::new(&config.service)?);
            let stdin = std::io::stdin();
            let mut stdout = std::io::stdout();
            interactive::run(&assessor, renderer, stdin.lock(), &mut stdout).await
        }
        Commands::Config { set } => commands::config(&config, set.as_deref()),
    }
}
