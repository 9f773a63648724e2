//! Reconnect delay schedule.
//!
//! Pure and clock-free: the transport asks for the next delay, sleeps, and
//! dials. A fresh [`Backoff`] is created for every failure episode, so a
//! successful reconnect resets the schedule for the next failure.

use std::time::Duration;

/// Delay before the first reconnect attempt.
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_secs(1);

/// Upper bound on any single delay.
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(30);

/// Attempts before the channel is given up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// Reconnection configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    /// Delay before the first attempt.
    pub initial_delay: Duration,
    /// Cap applied after every doubling.
    pub max_delay: Duration,
    /// Attempts per failure episode.
    pub max_attempts: u32,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            initial_delay: DEFAULT_INITIAL_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Exponential backoff for one failure episode.
///
/// Yields `max_attempts` delays starting at `initial_delay`, doubling each
/// time and capped at `max_delay`, then ends.
#[derive(Debug, Clone)]
pub struct Backoff {
    policy: ReconnectPolicy,
    attempts: u32,
    next: Duration,
}

impl Backoff {
    /// Start a new episode.
    pub fn new(policy: ReconnectPolicy) -> Self {
        Self { policy, attempts: 0, next: policy.initial_delay }
    }

    /// Attempts handed out so far in this episode.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Whether every attempt has been used.
    pub fn is_exhausted(&self) -> bool {
        self.attempts >= self.policy.max_attempts
    }
}

impl Iterator for Backoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        if self.is_exhausted() {
            return None;
        }

        let delay = self.next.min(self.policy.max_delay);
        self.attempts = self.attempts.saturating_add(1);
        self.next = self.next.saturating_mul(2).min(self.policy.max_delay);
        Some(delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_schedule() {
        let delays: Vec<u64> = Backoff::new(ReconnectPolicy::default()).map(|d| d.as_secs()).collect();

        assert_eq!(delays, [1, 2, 4, 8, 16, 30, 30, 30, 30, 30]);
    }

    #[test]
    fn exhaustion_is_permanent() {
        let mut backoff = Backoff::new(ReconnectPolicy { max_attempts: 2, ..Default::default() });

        assert!(backoff.next().is_some());
        assert!(backoff.next().is_some());
        assert!(backoff.is_exhausted());
        assert_eq!(backoff.next(), None);
        assert_eq!(backoff.next(), None);
        assert_eq!(backoff.attempts(), 2);
    }

    #[test]
    fn initial_delay_above_cap_is_capped() {
        let policy = ReconnectPolicy {
            initial_delay: Duration::from_secs(60),
            max_delay: Duration::from_secs(5),
            max_attempts: 3,
        };

        assert!(Backoff::new(policy).all(|d| d == Duration::from_secs(5)));
    }

    #[test]
    fn zero_attempts_yields_nothing() {
        let mut backoff = Backoff::new(ReconnectPolicy { max_attempts: 0, ..Default::default() });
        assert_eq!(backoff.next(), None);
    }
}
