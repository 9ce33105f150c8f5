//! Minimum-interval rate limiter.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::clock::Clock;

/// Notion allows about three requests per second per integration.
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(340);

/// Spaces consecutive calls at least `min_interval` apart.
///
/// The instant of the last call is owned by the limiter; one limiter belongs
/// to one client, so spacing holds across every operation of that client.
pub struct RateLimiter {
    min_interval: Duration,
    last_call: Mutex<Option<Instant>>,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    /// Create a limiter that never lets two calls start closer than `min_interval`.
    #[must_use]
    pub fn new(min_interval: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            min_interval,
            last_call: Mutex::new(None),
            clock,
        }
    }

    /// Configured minimum spacing.
    #[must_use]
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Wait until the next call may fire, then record it as the last call.
    ///
    /// Returns how long the caller was suspended.
    pub async fn acquire(&self) -> Duration {
        let wait = {
            let mut last = self
                .last_call
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            let now = self.clock.now();
            let wait = last.map_or(Duration::ZERO, |prev| {
                self.min_interval
                    .saturating_sub(now.saturating_duration_since(prev))
            });
            // The slot is reserved before sleeping so the lock is never held across an await.
            *last = Some(now + wait);
            wait
        };

        if !wait.is_zero() {
            debug!(wait = ?wait, "Rate limiting Notion request");
            self.clock.sleep(wait).await;
        }

        wait
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("min_interval", &self.min_interval)
            .finish_non_exhaustive()
    }
}
