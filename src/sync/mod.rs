//! Version sync between upstream releases and the publish workflow
//!
//! Compares the Allure versions pinned in the workflow's build matrix with
//! the latest stable upstream releases and rewrites the matrix when a
//! tracked line is behind. `--dry-run` reports without writing.

pub mod releases;
pub mod workflow;

use std::path::PathBuf;

use colored::Colorize;

use crate::common::{Error, Result};
use releases::{LatestVersions, TRACKED_MAJORS};
use workflow::Workflow;

/// Options for the `sync-versions` subcommand
#[derive(Debug)]
pub struct SyncOptions {
    /// Report updates without writing the workflow file
    pub dry_run: bool,
    /// Workflow file to update
    pub workflow: PathBuf,
}

/// Run the sync: report, fetch, compare, and conditionally rewrite
pub async fn run(opts: &SyncOptions) -> Result<()> {
    let mut wf = Workflow::load(&opts.workflow)?;

    println!("Current versions in workflow:");
    for &major in TRACKED_MAJORS {
        let current = wf.current_version(major)?;
        println!(
            "  Allure {major}.x: {}",
            current.as_deref().unwrap_or("not set")
        );
    }

    println!("\nFetching latest Allure versions from GitHub...");
    let client = reqwest::Client::new();
    let latest = match releases::fetch_latest(&client).await {
        Ok(latest) => latest,
        Err(e) => {
            eprintln!("\nTip: You can also manually check versions at:");
            eprintln!("https://github.com/allure-framework/allure2/releases");
            return Err(e);
        }
    };

    if let Some(v2) = latest.get(2) {
        println!("  Latest Allure 2.x: {v2}");
    } else {
        eprintln!("Warning: Could not find latest Allure 2.x version");
    }
    if let Some(v3) = latest.get(3) {
        println!("  Latest Allure 3.x: {v3}");
    } else {
        // The status quo: no stable 3.x exists yet
        println!("  Info: Allure 3.x not yet released (this is expected)");
    }
    if latest.is_empty() {
        return Err(Error::NoReleases);
    }

    if apply(&mut wf, &latest, opts.dry_run)? && !opts.dry_run {
        println!("\nNext steps:");
        println!("1. Review changes: git diff {}", wf.path().display());
        println!("2. Commit and push the version bump");
    }

    Ok(())
}

/// Compare and rewrite the workflow; returns whether an update was needed
///
/// The file is written only when `dry_run` is false and at least one
/// tracked line changed.
pub fn apply(wf: &mut Workflow, latest: &LatestVersions, dry_run: bool) -> Result<bool> {
    let mut needs_update = false;

    for &major in TRACKED_MAJORS {
        let Some(latest_version) = latest.get(major) else {
            continue;
        };
        let current = wf.current_version(major)?;
        if current.as_deref() != Some(latest_version) {
            println!(
                "\n{} Allure {major}.x update available: {} → {latest_version}",
                "→".cyan(),
                current.as_deref().unwrap_or("none")
            );
            needs_update = true;
        }
    }

    if !needs_update {
        println!("\n{} Already at latest versions!", "✓".green());
        return Ok(false);
    }

    if dry_run {
        println!(
            "\n[DRY RUN] Would update {}",
            wf.path().display().to_string().white().bold()
        );
        println!("Run without --dry-run to apply changes");
        return Ok(true);
    }

    println!("\nUpdating {}...", wf.path().display());
    for &major in TRACKED_MAJORS {
        if let Some(latest_version) = latest.get(major) {
            let _ = wf.set_version(major, latest_version)?;
        }
    }
    wf.save()?;
    println!("{} Workflow updated successfully!", "✓".green());

    Ok(true)
}
