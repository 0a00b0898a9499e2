//! CI tooling for the Allure Docker image
//!
//! Drives the packaged image through a Docker daemon for acceptance
//! testing, and keeps the Allure versions in the publish workflow in
//! sync with upstream releases.

pub mod commands;
pub mod common;
pub mod harness;
pub mod report;
pub mod sync;

// Re-export commonly used types for tests
pub use common::{Error, Result};
pub use harness::{Bind, Harness};
