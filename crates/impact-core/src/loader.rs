//! Retrying data loader with exponential backoff.
//!
//! Attempt `i` (zero-based) first waits [`RetryPolicy::delay_for_attempt`]
//! and then calls the source once. The first successful fetch is returned
//! whole. When every attempt fails the loader yields an empty series: the
//! caller treats that as a valid "no data" state, not a fault.
//!
//! The delay is the only suspension point of an attempt.

use std::time::Duration;

use impact_types::ImpactSeries;
use tracing::{debug, info, warn};

use crate::config::LoaderConfig;
use crate::source::ImpactSource;

/// Backoff schedule for the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts before giving up.
    pub max_attempts: u32,
    /// Delay before attempt 0, in milliseconds.
    pub initial_delay_ms: u64,
    /// Attempt `i > 0` waits `backoff_base_ms * 2^i` milliseconds.
    pub backoff_base_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&LoaderConfig::default())
    }
}

impl From<&LoaderConfig> for RetryPolicy {
    fn from(config: &LoaderConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            initial_delay_ms: config.initial_delay_ms,
            backoff_base_ms: config.backoff_base_ms,
        }
    }
}

impl RetryPolicy {
    /// Delay to wait before attempt `attempt`.
    ///
    /// `delay(0) = initial_delay_ms`, `delay(i) = backoff_base_ms * 2^i`
    /// otherwise. The product saturates at `u64::MAX` milliseconds.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::from_millis(self.initial_delay_ms);
        }
        let factor = 2_u64.checked_pow(attempt).unwrap_or(u64::MAX);
        Duration::from_millis(self.backoff_base_ms.saturating_mul(factor))
    }
}

/// Loads an [`ImpactSeries`] from a source, retrying with backoff.
#[derive(Debug)]
pub struct ImpactLoader<S> {
    source: S,
    policy: RetryPolicy,
}

impl<S: ImpactSource> ImpactLoader<S> {
    /// Create a loader over `source` with the given backoff schedule.
    pub const fn new(source: S, policy: RetryPolicy) -> Self {
        Self { source, policy }
    }

    /// Load using the policy's `max_attempts`.
    pub async fn load(&self) -> ImpactSeries {
        self.load_with_attempts(self.policy.max_attempts).await
    }

    /// Load, making at most `max_attempts` attempts.
    ///
    /// Returns an empty series if every attempt fails (or if
    /// `max_attempts` is 0).
    pub async fn load_with_attempts(&self, max_attempts: u32) -> ImpactSeries {
        for attempt in 0..max_attempts {
            let delay = self.policy.delay_for_attempt(attempt);
            debug!(attempt, delay_ms = delay.as_millis(), "waiting before fetch");
            tokio::time::sleep(delay).await;

            match self.source.fetch(attempt) {
                Ok(series) => {
                    info!(
                        attempt = attempt.saturating_add(1),
                        records = series.len(),
                        "impact data fetched"
                    );
                    return series;
                }
                Err(e) => {
                    warn!(
                        attempt = attempt.saturating_add(1),
                        max_attempts,
                        error = %e,
                        "impact data fetch attempt failed"
                    );
                }
            }
        }

        warn!(max_attempts, "impact data unavailable after all attempts, continuing with no data");
        ImpactSeries::empty()
    }
}
