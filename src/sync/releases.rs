//! Upstream release feed
//!
//! Fetches the Allure release list from the GitHub API and picks the
//! newest stable tag for each tracked major line. The feed is ordered
//! newest-first, so "newest" is simply the first acceptable entry.

use std::time::Duration;

use reqwest::header::{ACCEPT, USER_AGENT};
use semver::Version;
use serde::Deserialize;

use crate::common::{Error, Result};

/// GitHub API endpoint listing Allure releases
pub const RELEASES_URL: &str =
    "https://api.github.com/repos/allure-framework/allure2/releases";

/// User agent sent to the GitHub API (required by their policy)
const API_USER_AGENT: &str = "allure-image-version-sync";

/// The major version lines tracked in the publish workflow
pub const TRACKED_MAJORS: &[u64] = &[2, 3];

/// One entry of the release feed; only the fields we filter on
#[derive(Debug, Deserialize)]
pub struct Release {
    pub tag_name: String,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub prerelease: bool,
}

/// Latest stable version per tracked major line
#[derive(Debug, Default, PartialEq, Eq)]
pub struct LatestVersions {
    pub v2: Option<String>,
    pub v3: Option<String>,
}

impl LatestVersions {
    /// Latest version for a tracked major, if any
    pub fn get(&self, major: u64) -> Option<&str> {
        match major {
            2 => self.v2.as_deref(),
            3 => self.v3.as_deref(),
            _ => None,
        }
    }

    /// True when no tracked line has a version at all
    pub fn is_empty(&self) -> bool {
        self.v2.is_none() && self.v3.is_none()
    }
}

/// Fetch the release feed and select the latest stable tags
///
/// Any transport or decode failure is a fatal environment error; the
/// caller prints guidance for checking the releases page manually.
pub async fn fetch_latest(client: &reqwest::Client) -> Result<LatestVersions> {
    let releases = client
        .get(RELEASES_URL)
        .header(ACCEPT, "application/vnd.github+json")
        .header(USER_AGENT, API_USER_AGENT)
        .timeout(Duration::from_secs(10))
        .send()
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(Error::ReleaseFetch)?
        .json::<Vec<Release>>()
        .await
        .map_err(Error::ReleaseFetch)?;

    Ok(select_latest(&releases))
}

/// Pick the first stable `X.Y.Z` tag per tracked major line
pub fn select_latest(releases: &[Release]) -> LatestVersions {
    let mut latest = LatestVersions::default();

    for release in releases {
        if release.draft || release.prerelease {
            continue;
        }
        let Some(version) = stable_version(&release.tag_name) else {
            continue;
        };

        match version.major {
            2 if latest.v2.is_none() => latest.v2 = Some(version.to_string()),
            3 if latest.v3.is_none() => latest.v3 = Some(version.to_string()),
            _ => {}
        }

        if latest.v2.is_some() && latest.v3.is_some() {
            break;
        }
    }

    latest
}

/// Parse a tag into a strictly-numeric `X.Y.Z` version
///
/// A leading `v` is tolerated; anything with a prerelease or build suffix
/// is rejected even when the release itself is not flagged as prerelease.
fn stable_version(tag: &str) -> Option<Version> {
    let version = Version::parse(tag.strip_prefix('v').unwrap_or(tag)).ok()?;
    if !version.pre.is_empty() || !version.build.is_empty() {
        return None;
    }
    Some(version)
}
