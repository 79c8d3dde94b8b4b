//! Clock abstraction for cache expiry and cool-down timing.
//!
//! Production code uses [`SystemClock`]; tests inject a [`ManualClock`]
//! they can advance deterministically, so TTL and backoff behavior is
//! testable without sleeping.

use std::time::{Instant, SystemTime, UNIX_EPOCH};
#[cfg(test)]
use std::time::Duration;

/// Source of time for the resolver's bookkeeping.
pub trait Clock: Send + Sync {
    /// Monotonic now, for TTLs and backoff intervals.
    fn now(&self) -> Instant;

    /// Wall-clock now as unix seconds, for provider expiry hints.
    fn unix_time(&self) -> u64;
}

/// Real time.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn unix_time(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

/// Manually advanced clock for tests.
#[cfg(test)]
pub struct ManualClock {
    start: Instant,
    offset: parking_lot::Mutex<Duration>,
    unix_base: u64,
}

#[cfg(test)]
impl ManualClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            offset: parking_lot::Mutex::new(Duration::ZERO),
            unix_base: 1_700_000_000,
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.offset.lock() += by;
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.start + *self.offset.lock()
    }

    fn unix_time(&self) -> u64 {
        self.unix_base + self.offset.lock().as_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advances() {
        let clock = ManualClock::new();
        let t0 = clock.now();
        let u0 = clock.unix_time();

        clock.advance(Duration::from_secs(90));

        assert_eq!(clock.now() - t0, Duration::from_secs(90));
        assert_eq!(clock.unix_time() - u0, 90);
    }

    #[test]
    fn test_system_clock_unix_time_is_sane() {
        // After 2023, before 2100
        let now = SystemClock.unix_time();
        assert!(now > 1_680_000_000);
        assert!(now < 4_100_000_000);
    }
}
