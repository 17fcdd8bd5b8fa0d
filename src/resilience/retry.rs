use tokio::time::{sleep, Duration};
use tracing::{error, warn};

use crate::config::settings::RetryConfig;
use crate::utils::constants::{
    DEFAULT_RETRY_ATTEMPTS, DEFAULT_RETRY_BASE_DELAY_MS, DEFAULT_RETRY_MAX_DELAY_MS,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrySettings {
    pub attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_RETRY_ATTEMPTS,
            base_delay_ms: DEFAULT_RETRY_BASE_DELAY_MS,
            max_delay_ms: DEFAULT_RETRY_MAX_DELAY_MS,
        }
    }
}

impl From<Option<&RetryConfig>> for RetrySettings {
    fn from(retry: Option<&RetryConfig>) -> Self {
        let defaults = RetrySettings::default();
        Self {
            attempts: retry.and_then(|r| r.attempts).unwrap_or(defaults.attempts).max(1),
            base_delay_ms: retry.and_then(|r| r.base_delay_ms).unwrap_or(defaults.base_delay_ms),
            max_delay_ms: retry.and_then(|r| r.max_delay_ms).unwrap_or(defaults.max_delay_ms),
        }
    }
}

impl RetrySettings {
    /// Run `operation` until it succeeds, returns an error `should_retry`
    /// rejects, or attempts run out. The delay doubles up to `max_delay_ms`.
    pub async fn run_with_retry<F, Fut, T, E, R>(&self, mut operation: F, should_retry: R) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
        E: std::fmt::Display,
        R: Fn(&E) -> bool,
    {
        let mut delay = self.base_delay_ms;
        let mut attempt: u32 = 1;

        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.attempts && should_retry(&e) => {
                    warn!("Attempt {attempt}/{} failed: {e}", self.attempts);
                    sleep(Duration::from_millis(delay)).await;
                    delay = self.next_delay(delay);
                    attempt += 1;
                }
                Err(e) => {
                    if attempt > 1 {
                        error!("all {attempt} attempts failed: {e}");
                    }
                    return Err(e);
                }
            }
        }
    }

    fn next_delay(&self, delay: u64) -> u64 {
        delay.saturating_mul(2).min(self.max_delay_ms)
    }
}
