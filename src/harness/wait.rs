//! Bounded readiness polling
//!
//! Waits for a served endpoint to answer 200. Fixed interval, fixed attempt
//! count, no backoff; the caller attaches container logs to the failure.

use std::time::Duration;

use tracing::debug;

use crate::common::{Error, Result};

/// Poll schedule for a readiness check
#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    /// Sleep between attempts
    pub interval: Duration,
    /// Maximum number of attempts before giving up
    pub max_attempts: u32,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_attempts: 30,
            request_timeout: Duration::from_secs(2),
        }
    }
}

impl PollConfig {
    /// Total time budget covered by this schedule
    pub fn deadline_secs(&self) -> u64 {
        self.interval.as_secs() * u64::from(self.max_attempts)
    }
}

/// Poll `url` until it answers 200, returning the response body
///
/// Connection errors and non-200 statuses count as "not ready yet" and are
/// retried; exhausting the schedule yields [`Error::ServeTimeout`].
pub async fn wait_for_http(client: &reqwest::Client, url: &str, cfg: PollConfig) -> Result<String> {
    for attempt in 1..=cfg.max_attempts {
        match client
            .get(url)
            .timeout(cfg.request_timeout)
            .send()
            .await
        {
            Ok(resp) if resp.status().is_success() => {
                debug!(url, attempt, "endpoint ready");
                return Ok(resp.text().await?);
            }
            Ok(resp) => {
                debug!(url, attempt, status = %resp.status(), "endpoint not ready");
            }
            Err(e) => {
                debug!(url, attempt, "endpoint not reachable: {e}");
            }
        }
        tokio::time::sleep(cfg.interval).await;
    }

    Err(Error::ServeTimeout {
        secs: cfg.deadline_secs(),
    })
}

/// One-shot GET that treats any failure as "absent"
///
/// Used for optional endpoints like the behaviors data file: if it does not
/// answer 200 the caller skips its assertions rather than failing.
pub async fn try_get(client: &reqwest::Client, url: &str, timeout: Duration) -> Option<String> {
    let resp = client.get(url).timeout(timeout).send().await.ok()?;
    if !resp.status().is_success() {
        return None;
    }
    resp.text().await.ok()
}
