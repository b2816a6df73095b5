// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "metafora")]
#[command(about = "Deploy GitHub release artifacts to Anypoint CloudHub")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output for CI
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Emit JSON lines instead of human-readable output
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Deploy a release artifact to a CloudHub application
    Deploy {
        /// Release tag identifying the build to deploy
        #[arg(long)]
        release_tag: String,

        /// Target environment name (matched case-insensitively)
        #[arg(long)]
        environment: String,

        /// CloudHub application name
        #[arg(long)]
        app_name: String,

        /// Anypoint organization id (defaults to the house organization)
        #[arg(long)]
        org_id: Option<String>,
    },
}
