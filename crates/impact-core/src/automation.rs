//! The auto-advance timer as an owned resource.
//!
//! [`AutomationTimer`] holds an optional [`Interval`]. The interval exists
//! iff automation is running, so "running" and "timer armed" can never
//! disagree. Stopping drops the interval, which is the single teardown path;
//! dropping the timer itself has the same effect.
//!
//! [`tick`](AutomationTimer::tick) is cancel safe and may be used as a
//! `tokio::select!` branch. While stopped it never resolves, so a stopped
//! timer cannot produce another tick.

use std::future;
use std::time::Duration;

use tokio::time::{Interval, MissedTickBehavior};

/// Periodic tick source that can be started and stopped.
#[derive(Debug, Default)]
pub struct AutomationTimer {
    interval: Option<Interval>,
}

impl AutomationTimer {
    /// Create a stopped timer.
    pub const fn new() -> Self {
        Self { interval: None }
    }

    /// Whether the timer is armed.
    pub const fn is_running(&self) -> bool {
        self.interval.is_some()
    }

    /// Arm the timer with the given period.
    ///
    /// The first tick fires one full `period` after this call. Returns
    /// `false` without touching the existing timer if already running.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(&mut self, period: Duration) -> bool {
        if self.interval.is_some() {
            return false;
        }
        let period = period.max(Duration::from_millis(1));
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // Skip the immediate first tick.
        interval.reset();
        self.interval = Some(interval);
        true
    }

    /// Disarm the timer. Returns `false` if it was already stopped.
    pub fn stop(&mut self) -> bool {
        self.interval.take().is_some()
    }

    /// The configured period, if running.
    pub fn period(&self) -> Option<Duration> {
        self.interval.as_ref().map(Interval::period)
    }

    /// Wait for the next tick.
    ///
    /// Pends forever while stopped.
    pub async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => future::pending::<()>().await,
        }
    }
}
