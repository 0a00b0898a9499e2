//! Publish workflow editing
//!
//! The workflow's build matrix holds one block per tracked major line:
//!
//! ```yaml
//! - version: "2.35.1"
//!   major: "2"
//! ```
//!
//! Both extraction and substitution key on the adjacent `major` marker so
//! one line can be updated without touching the other, and only the quoted
//! version string inside the matched block is ever replaced.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::common::{Error, Result};

/// The workflow file under edit, held in memory until saved
#[derive(Debug)]
pub struct Workflow {
    path: PathBuf,
    content: String,
}

impl Workflow {
    /// Load the workflow file; a missing file is a fatal precondition error
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::WorkflowNotFound(path.to_path_buf()));
        }
        Ok(Self {
            path: path.to_path_buf(),
            content: fs::read_to_string(path)?,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Version currently pinned for a major line, if the block exists
    pub fn current_version(&self, major: u64) -> Result<Option<String>> {
        let re = Regex::new(&format!(
            r#"- version: "([^"]+)"\s+major: "{major}""#
        ))?;
        Ok(re
            .captures(&self.content)
            .map(|caps| caps[1].to_string()))
    }

    /// Replace the version string in the block for `major`
    ///
    /// Returns whether the content changed. Blocks for other majors and
    /// all surrounding content are left byte-identical.
    pub fn set_version(&mut self, major: u64, version: &str) -> Result<bool> {
        let re = Regex::new(&format!(
            r#"(- version: ")[^"]+(" *\n\s+major: "{major}")"#
        ))?;
        let replacement = format!("${{1}}{version}${{2}}");
        let updated = re.replace_all(&self.content, replacement.as_str());

        if updated == self.content {
            return Ok(false);
        }
        self.content = updated.into_owned();
        Ok(true)
    }

    /// Write the (possibly edited) content back to disk
    pub fn save(&self) -> Result<()> {
        Ok(fs::write(&self.path, &self.content)?)
    }
}
