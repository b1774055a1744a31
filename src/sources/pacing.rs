//! Request pacing and rate-limit backoff for indicator fetches.

use crate::error::Result;
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

/// How successive provider calls are spaced and how 429s are retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    /// Minimum gap between the starts of two calls.
    pub min_interval: Duration,
    /// Retries after a rate-limit response. 0 propagates the first 429.
    pub max_retries: u32,
    /// Base delay before the first retry; doubled on each further attempt.
    pub backoff: Duration,
    /// Random extra delay as a percentage of the backoff.
    pub jitter_percent: u32,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            min_interval: Duration::from_millis(15_000),
            max_retries: 0,
            backoff: Duration::from_millis(30_000),
            jitter_percent: 20,
        }
    }
}

impl RateLimitPolicy {
    /// No spacing and no retries.
    pub fn unpaced() -> Self {
        Self {
            min_interval: Duration::ZERO,
            max_retries: 0,
            backoff: Duration::ZERO,
            jitter_percent: 0,
        }
    }

    /// Delay before retry number `attempt` (0-based).
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let base_ms = self.backoff.as_millis() as u64;
        let scaled = base_ms.saturating_mul(1u64 << attempt.min(16));
        Duration::from_millis(jitter_wait(scaled, self.jitter_percent))
    }
}

/// `base_ms` plus a random extra of up to `jitter_percent` percent.
fn jitter_wait(base_ms: u64, jitter_percent: u32) -> u64 {
    let jitter_range = if jitter_percent == 0 {
        1
    } else {
        std::cmp::max(1, base_ms.saturating_mul(u64::from(jitter_percent)) / 100)
    };
    base_ms + rand::thread_rng().gen_range(0..jitter_range)
}

/// Serializes calls according to a [`RateLimitPolicy`].
pub struct Pacer {
    policy: RateLimitPolicy,
    last_call: Mutex<Option<Instant>>,
}

impl Pacer {
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self {
            policy,
            last_call: Mutex::new(None),
        }
    }

    /// Wait until `min_interval` has passed since the previous call started.
    pub async fn wait_turn(&self) {
        let mut last_call = self.last_call.lock().await;
        if let Some(previous) = *last_call {
            let ready_at = previous + self.policy.min_interval;
            if ready_at > Instant::now() {
                debug!("Pacing next request by {:?}", ready_at - Instant::now());
                tokio::time::sleep_until(ready_at).await;
            }
        }
        *last_call = Some(Instant::now());
    }

    /// Run `call` in turn, retrying rate-limited attempts with backoff.
    pub async fn run<T, F, Fut>(&self, mut call: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0;
        loop {
            self.wait_turn().await;
            match call().await {
                Err(e) if e.is_rate_limited() && attempt < self.policy.max_retries => {
                    let delay = self.policy.backoff_delay(attempt);
                    warn!(
                        "Rate limited (attempt {}/{}), retrying in {:?}",
                        attempt + 1,
                        self.policy.max_retries,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }
}
