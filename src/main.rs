use clap::Parser;
use spark::cli::{Cli, Commands};
use spark::process::{CommandRunner, SystemRunner};
use std::process::ExitCode;
use std::sync::Arc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    spark::tui::init_tracing(cli.log.clone());

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.load_config()?;
    let catalog = spark::cli::load_catalog(&config)?;
    let runner: Arc<dyn CommandRunner> = Arc::new(SystemRunner);

    match &cli.command {
        Some(Commands::List(args)) => spark::cli::list(args, &config, &catalog, runner).await,
        None => spark::tui::run(config, catalog, runner).await,
    }
}
