//! CI entry point for the Allure Docker image
//!
//! Two maintenance operations: syncing the publish workflow with upstream
//! Allure releases, and running quick sanity checks against a built image.

use clap::Parser;

use allure_image::commands::Commands;
use allure_image::{common, harness, sync};

#[derive(Parser)]
#[command(name = "allure-image", about = "CI tooling for the Allure Docker image")]
#[command(version, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    common::logging::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::SyncVersions { dry_run, workflow } => {
            sync::run(&sync::SyncOptions { dry_run, workflow }).await
        }
        Commands::Check { image } => harness::checks::run(&image).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
