//! Common utilities shared between the CLI and the test harness

pub mod error;
pub mod logging;

pub use error::{Error, Result};
