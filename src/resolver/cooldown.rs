//! Per-provider failure tracking and cool-down.
//!
//! A provider that keeps failing is suspended for a backoff interval so
//! repeated slow timeouts against a dead backend don't drag down every
//! request's latency. Rate-limit signals suspend the provider
//! immediately, for longer, independent of the consecutive-failure
//! counter. All state is in-memory and per-resolver; nothing is
//! persisted.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::resolver::clock::Clock;
use crate::resolver::domain::ProviderTag;

/// Tunables for the cool-down behavior.
#[derive(Debug, Clone)]
pub struct CooldownPolicy {
    /// Consecutive failures within the window that trigger a suspension
    pub failure_threshold: u32,
    /// Sliding window over which consecutive failures are counted
    pub failure_window: Duration,
    /// How long a provider stays suspended after tripping the threshold
    pub backoff: Duration,
    /// Suspension applied immediately on a rate-limit signal
    pub rate_limit_backoff: Duration,
}

impl Default for CooldownPolicy {
    fn default() -> Self {
        Self {
            failure_threshold: 3,
            failure_window: Duration::from_secs(60),
            backoff: Duration::from_secs(60),
            rate_limit_backoff: Duration::from_secs(300),
        }
    }
}

#[derive(Debug, Default)]
struct ProviderHealth {
    consecutive_failures: u32,
    window_started: Option<Instant>,
    blocked_until: Option<Instant>,
}

/// Tracks failure counts and suspensions for every provider.
pub struct CooldownTracker {
    policy: CooldownPolicy,
    clock: Arc<dyn Clock>,
    states: Mutex<HashMap<ProviderTag, ProviderHealth>>,
}

impl CooldownTracker {
    pub fn new(policy: CooldownPolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            policy,
            clock,
            states: Mutex::new(HashMap::new()),
        }
    }

    /// Is this provider currently suspended?
    pub fn is_blocked(&self, tag: ProviderTag) -> bool {
        let now = self.clock.now();
        let mut states = self.states.lock();
        let Some(state) = states.get_mut(&tag) else {
            return false;
        };

        match state.blocked_until {
            Some(until) if now < until => true,
            Some(_) => {
                // Suspension elapsed; the provider gets a clean slate
                state.blocked_until = None;
                state.consecutive_failures = 0;
                state.window_started = None;
                false
            }
            None => false,
        }
    }

    /// Record one failure. Trips the suspension once the threshold is
    /// reached within the sliding window.
    pub fn record_failure(&self, tag: ProviderTag) {
        let now = self.clock.now();
        let mut states = self.states.lock();
        let state = states.entry(tag).or_default();

        let window_expired = state
            .window_started
            .is_some_and(|started| now.duration_since(started) > self.policy.failure_window);

        if window_expired || state.window_started.is_none() {
            state.window_started = Some(now);
            state.consecutive_failures = 0;
        }
        state.consecutive_failures += 1;

        if state.consecutive_failures >= self.policy.failure_threshold {
            state.blocked_until = Some(now + self.policy.backoff);
            tracing::warn!(
                "provider {} suspended for {:?} after {} consecutive failures",
                tag,
                self.policy.backoff,
                state.consecutive_failures
            );
        }
    }

    /// Rate-limit signal: suspend immediately, for the longer interval.
    pub fn record_rate_limit(&self, tag: ProviderTag) {
        let now = self.clock.now();
        let mut states = self.states.lock();
        let state = states.entry(tag).or_default();
        state.blocked_until = Some(now + self.policy.rate_limit_backoff);
        tracing::warn!(
            "provider {} rate limited, suspended for {:?}",
            tag,
            self.policy.rate_limit_backoff
        );
    }

    /// A success clears the consecutive-failure streak.
    pub fn record_success(&self, tag: ProviderTag) {
        let mut states = self.states.lock();
        if let Some(state) = states.get_mut(&tag) {
            state.consecutive_failures = 0;
            state.window_started = None;
        }
    }

    /// Current consecutive-failure count (0 if the provider is unknown).
    pub fn failure_count(&self, tag: ProviderTag) -> u32 {
        self.states
            .lock()
            .get(&tag)
            .map(|s| s.consecutive_failures)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::clock::ManualClock;

    fn tracker() -> (CooldownTracker, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let policy = CooldownPolicy {
            failure_threshold: 3,
            failure_window: Duration::from_secs(60),
            backoff: Duration::from_secs(60),
            rate_limit_backoff: Duration::from_secs(300),
        };
        (CooldownTracker::new(policy, clock.clone()), clock)
    }

    #[test]
    fn test_not_blocked_initially() {
        let (tracker, _clock) = tracker();
        assert!(!tracker.is_blocked(ProviderTag::Piped));
    }

    #[test]
    fn test_blocked_after_threshold_failures() {
        let (tracker, _clock) = tracker();

        tracker.record_failure(ProviderTag::Piped);
        tracker.record_failure(ProviderTag::Piped);
        assert!(!tracker.is_blocked(ProviderTag::Piped));

        tracker.record_failure(ProviderTag::Piped);
        assert!(tracker.is_blocked(ProviderTag::Piped));
        // Other providers are unaffected
        assert!(!tracker.is_blocked(ProviderTag::YtDlp));
    }

    #[test]
    fn test_suspension_elapses() {
        let (tracker, clock) = tracker();
        for _ in 0..3 {
            tracker.record_failure(ProviderTag::Piped);
        }
        assert!(tracker.is_blocked(ProviderTag::Piped));

        clock.advance(Duration::from_secs(61));
        assert!(!tracker.is_blocked(ProviderTag::Piped));
        // Clean slate after the suspension: one new failure doesn't re-trip
        tracker.record_failure(ProviderTag::Piped);
        assert!(!tracker.is_blocked(ProviderTag::Piped));
    }

    #[test]
    fn test_window_expiry_resets_streak() {
        let (tracker, clock) = tracker();

        tracker.record_failure(ProviderTag::InnerTube);
        tracker.record_failure(ProviderTag::InnerTube);

        // Old failures age out of the sliding window
        clock.advance(Duration::from_secs(61));
        tracker.record_failure(ProviderTag::InnerTube);

        assert_eq!(tracker.failure_count(ProviderTag::InnerTube), 1);
        assert!(!tracker.is_blocked(ProviderTag::InnerTube));
    }

    #[test]
    fn test_success_clears_streak() {
        let (tracker, _clock) = tracker();

        tracker.record_failure(ProviderTag::YouTube);
        tracker.record_failure(ProviderTag::YouTube);
        tracker.record_success(ProviderTag::YouTube);
        tracker.record_failure(ProviderTag::YouTube);

        assert!(!tracker.is_blocked(ProviderTag::YouTube));
        assert_eq!(tracker.failure_count(ProviderTag::YouTube), 1);
    }

    #[test]
    fn test_rate_limit_blocks_immediately_and_longer() {
        let (tracker, clock) = tracker();

        tracker.record_rate_limit(ProviderTag::YouTube);
        assert!(tracker.is_blocked(ProviderTag::YouTube));

        // Still blocked after the ordinary backoff would have elapsed
        clock.advance(Duration::from_secs(120));
        assert!(tracker.is_blocked(ProviderTag::YouTube));

        clock.advance(Duration::from_secs(200));
        assert!(!tracker.is_blocked(ProviderTag::YouTube));
    }
}
