use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tracing::debug;

use crate::error::{Error, Result};

/// Backoff policy for rate-limited and transient failures.
///
/// Delays grow as `initial_backoff * multiplier^(attempt-1)`, capped at
/// `max_backoff`, with `jitter` randomness applied to avoid thundering herd.
/// When Auth0 sends a `Retry-After` header that delay wins over the computed
/// backoff, but it is still capped at `max_backoff` so a hostile or
/// misconfigured server cannot park the caller for minutes.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub multiplier: f64,
    pub jitter: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(10),
            multiplier: 2.0,
            jitter: 0.25,
        }
    }
}

impl RetryPolicy {
    /// Policy that never retries.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Backoff before the attempt following `attempt` (1-based), before jitter.
    fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31) as i32;
        let nanos = self.initial_backoff.as_nanos() as f64 * self.multiplier.powi(exponent);
        let capped = nanos.min(self.max_backoff.as_nanos() as f64);
        Duration::from_nanos(capped as u64)
    }
}

/// Run `operation` with retries per `policy`.
///
/// Non-retryable errors return immediately. When the budget runs out on a
/// retryable error the result is [`Error::RetryExhausted`].
pub async fn with_retry<F, Fut, T>(policy: &RetryPolicy, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;

        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if !err.is_retryable() {
            return Err(err);
        }
        if attempt >= policy.max_attempts.max(1) {
            return Err(Error::RetryExhausted {
                attempts: attempt,
                last_error: err.to_string(),
            });
        }

        let delay = match err.retry_after() {
            Some(server) => server.min(policy.max_backoff),
            None => apply_jitter(policy.backoff(attempt), policy.jitter),
        };

        debug!(
            attempt = attempt,
            backoff_ms = delay.as_millis() as u64,
            error = %err,
            "retrying auth0 request after backoff"
        );

        tokio::time::sleep(delay).await;
    }
}

/// Randomize `dur` within `[dur * (1 - factor), dur * (1 + factor)]`.
fn apply_jitter(dur: Duration, factor: f64) -> Duration {
    if factor <= 0.0 {
        return dur;
    }

    let factor = factor.clamp(0.0, 1.0);
    let base = dur.as_nanos() as f64;
    let jittered = rand::thread_rng().gen_range(base * (1.0 - factor)..=base * (1.0 + factor));
    Duration::from_nanos(jittered as u64)
}
