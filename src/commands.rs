//! CLI command definitions
//!
//! Defines the clap commands for the `allure-image` binary.

use clap::Subcommand;
use std::path::PathBuf;

/// Default image reference when `ALLURE_IMAGE` is not set
pub const DEFAULT_IMAGE: &str = "allure-test:latest";

/// Default location of the publish workflow edited by `sync-versions`
pub const DEFAULT_WORKFLOW: &str = ".github/workflows/dockerhub.yml";

#[derive(Subcommand)]
pub enum Commands {
    /// Sync the Allure versions in the publish workflow with upstream releases
    #[command(name = "sync-versions")]
    SyncVersions {
        /// Show what would be updated without writing the workflow file
        #[arg(long)]
        dry_run: bool,

        /// Workflow file to update
        #[arg(long, default_value = DEFAULT_WORKFLOW)]
        workflow: PathBuf,
    },

    /// Run quick one-shot checks against the packaged image
    Check {
        /// Image reference to test
        #[arg(long, env = "ALLURE_IMAGE", default_value = DEFAULT_IMAGE)]
        image: String,
    },
}
