// ABOUTME: Entry point for the metafora CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use metafora::commands;
use metafora::config::Config;
use metafora::error::Result;
use metafora::output::{Output, OutputMode};
use metafora::types::{AppName, ReleaseTag};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };
    let output = Output::new(mode);

    let result = run(cli, output).await;

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, output: Output) -> Result<()> {
    match cli.command {
        Commands::Deploy {
            release_tag,
            environment,
            app_name,
            org_id,
        } => {
            let release_tag = ReleaseTag::new(&release_tag)?;
            let app_name = AppName::new(&app_name)?;
            let config = Config::new(release_tag, environment, app_name, org_id);

            commands::deploy(config, output).await
        }
    }
}
