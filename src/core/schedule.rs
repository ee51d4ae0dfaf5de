//! Timing policies used by the interactive session

use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::time::{Instant, sleep_until};

pub const DEBOUNCE_QUIET_PERIOD: Duration = Duration::from_millis(500);
pub const SWAP_THROTTLE_INTERVAL: Duration = Duration::from_millis(500);
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Holds the latest triggered value until no new trigger arrives for the quiet period.
pub struct Debouncer<T> {
    quiet: Duration,
    pending: Option<(Instant, T)>,
}

impl<T> Debouncer<T> {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
        }
    }

    /// Replaces any pending value and restarts the quiet period.
    pub fn trigger(&mut self, value: T) {
        self.pending = Some((Instant::now() + self.quiet, value));
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Resolves with the pending value once its quiet period has elapsed.
    /// Cancel-safe: dropping the future keeps the value pending.
    pub async fn fired(&mut self) -> Option<T> {
        let deadline = self.pending.as_ref().map(|(deadline, _)| *deadline)?;
        sleep_until(deadline).await;
        self.pending.take().map(|(_, value)| value)
    }
}

/// Allows an action at most once per interval.
pub struct Throttle {
    interval: Duration,
    last: Option<Instant>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    pub fn try_acquire(&mut self) -> bool {
        let now = Instant::now();
        match self.last {
            Some(last) if now.duration_since(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RefreshPolicy {
    pub max_age: Duration,
}

impl RefreshPolicy {
    pub fn new(max_age: Duration) -> Self {
        Self { max_age }
    }

    /// Rates never loaded count as stale.
    pub fn is_stale(&self, last_update: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        let Some(last_update) = last_update else {
            return true;
        };
        match (now - last_update).to_std() {
            Ok(age) => age >= self.max_age,
            // Clock went backwards; keep what we have.
            Err(_) => false,
        }
    }
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self::new(REFRESH_INTERVAL)
    }
}
