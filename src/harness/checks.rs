//! One-shot sanity checks against the packaged image
//!
//! Both checks run a single command in a fresh container and validate the
//! captured output. They back the `check` CLI subcommand and the
//! acceptance tests.

use colored::Colorize;

use crate::common::{Error, Result};
use crate::harness::Harness;

/// Run `allure --version` in the image and validate the output
///
/// Allure prints a bare version number such as `2.35.1`, so the output
/// must be non-empty and start with a digit.
pub async fn allure_version(harness: &Harness) -> Result<String> {
    let output = harness.run_to_completion(&["allure", "--version"], &[]).await?;
    let version = output.trim().to_string();

    if !version.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        return Err(Error::check(format!(
            "unexpected `allure --version` output: '{version}'"
        )));
    }
    Ok(version)
}

/// Run `java -version` in the image and validate the output
///
/// Java writes its banner to stderr; the harness captures both streams, so
/// we only need a case-insensitive marker match.
pub async fn java_version(harness: &Harness) -> Result<String> {
    let output = harness.run_to_completion(&["java", "-version"], &[]).await?;
    let banner = output.trim().to_string();

    let lowered = banner.to_lowercase();
    if !lowered.contains("java") && !lowered.contains("openjdk") {
        return Err(Error::check(format!(
            "Java not found or unexpected version output: '{banner}'"
        )));
    }
    Ok(banner)
}

/// Run both image checks and report results (the `check` subcommand)
pub async fn run(image: &str) -> Result<()> {
    let harness = Harness::with_image(image)?;

    println!("Checking image {}", harness.image().white().bold());

    let version = allure_version(&harness).await?;
    println!("  {} Allure version: {}", "✓".green(), version);

    let banner = java_version(&harness).await?;
    let first_line = banner.lines().next().unwrap_or_default();
    println!("  {} Java is available: {}", "✓".green(), first_line);

    Ok(())
}
