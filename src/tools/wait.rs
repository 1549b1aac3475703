//! Bounded waits
//!
//! Polling with exponential backoff and jitter, capped by a deadline. Missing
//! and stale elements count as "not yet"; anything else ends the wait.

use std::future::Future;
use std::time::{Duration, Instant};

use rand::Rng;
use tokio::time::sleep;
use tracing::trace;

use crate::core::config::WaitConfig;
use crate::core::{Result, Selector, ShopError};
use crate::driver::BrowserSession;

/// Deadline and poll cadence for one wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub timeout: Duration,
    pub initial_interval: Duration,
    pub max_interval: Duration,
}

impl WaitPolicy {
    pub fn new(timeout: Duration, config: &WaitConfig) -> Self {
        Self {
            timeout,
            initial_interval: Duration::from_millis(config.poll_interval_ms),
            max_interval: Duration::from_millis(config.max_poll_interval_ms),
        }
    }

    /// Interval after `interval`, doubled up to the ceiling
    fn next_interval(&self, interval: Duration) -> Duration {
        (interval * 2).min(self.max_interval)
    }
}

impl Default for WaitPolicy {
    fn default() -> Self {
        let config = WaitConfig::default();
        Self::new(config.interaction_timeout(), &config)
    }
}

/// Poll `probe` until it yields a value or the deadline passes
pub async fn wait_until<T, F, Fut>(policy: &WaitPolicy, what: &str, mut probe: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>>>,
{
    let start = Instant::now();
    let mut interval = policy.initial_interval;

    loop {
        match probe().await {
            Ok(Some(value)) => return Ok(value),
            Ok(None) => {}
            Err(e) if e.is_transient() => trace!("waiting for {}: {}", what, e),
            Err(e) => return Err(e),
        }

        let elapsed = start.elapsed();
        if elapsed >= policy.timeout {
            return Err(ShopError::Timeout {
                what: what.to_string(),
                waited: elapsed,
            });
        }

        let remaining = policy.timeout - elapsed;
        sleep(jittered(interval).min(remaining)).await;
        interval = policy.next_interval(interval);
    }
}

/// Up to a quarter of `interval` added on top
fn jittered(interval: Duration) -> Duration {
    let spread = (interval.as_millis() / 4) as u64;
    if spread == 0 {
        return interval;
    }
    interval + Duration::from_millis(rand::rng().random_range(0..=spread))
}

/// Wait for at least one element matching `selector`
pub async fn present<S: BrowserSession>(
    session: &S,
    selector: &Selector,
    policy: &WaitPolicy,
) -> Result<S::Element> {
    wait_until(policy, &format!("presence of {}", selector), move || async move {
        session.find(selector).await.map(Some)
    })
    .await
}

/// Wait until `selector` matches a non-empty list
pub async fn present_all<S: BrowserSession>(
    session: &S,
    selector: &Selector,
    policy: &WaitPolicy,
) -> Result<Vec<S::Element>> {
    wait_until(policy, &format!("presence of all {}", selector), move || async move {
        let found = session.find_all(selector).await?;
        Ok((!found.is_empty()).then_some(found))
    })
    .await
}

/// Wait for the current document to finish loading
pub async fn settle<S: BrowserSession>(session: &S, policy: &WaitPolicy) -> Result<()> {
    wait_until(policy, "page to settle", move || async move {
        let state = session.ready_state().await?;
        Ok((state == "complete").then_some(()))
    })
    .await
}
