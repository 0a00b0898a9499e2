//! Error types for the image CI tooling
//!
//! Environment errors (no Docker daemon, unreachable release API, missing
//! workflow file) are fatal; assertion errors carry enough context to
//! diagnose a failing image without re-running the container.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the image CI tooling
#[derive(Error, Debug)]
pub enum Error {
    // === Container engine errors ===
    #[error("Docker error: {0}")]
    Docker(#[from] bollard::errors::Error),

    #[error("Container exited with status {code}:\n{output}")]
    ContainerFailed { code: i64, output: String },

    #[error("Server did not become ready within {secs}s")]
    ServeTimeout { secs: u64 },

    // === Release feed errors ===
    #[error("Failed to fetch releases: {0}")]
    ReleaseFetch(#[source] reqwest::Error),

    #[error("No usable release versions found in the feed")]
    NoReleases,

    // === Workflow file errors ===
    #[error("Workflow file not found: {}", .0.display())]
    WorkflowNotFound(PathBuf),

    #[error("Invalid version pattern: {0}")]
    Pattern(#[from] regex::Error),

    // === Assertion errors ===
    #[error("Check failed: {0}")]
    Check(String),

    #[error("Behavior tree node missing: {0}")]
    BehaviorNode(String),

    // === HTTP / IO / serialization passthrough ===
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a check failure with a formatted message
    pub fn check(msg: impl Into<String>) -> Self {
        Self::Check(msg.into())
    }
}
