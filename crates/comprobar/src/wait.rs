//! Wait mechanisms for element synchronization.
//!
//! Every element operation carries a bounded wait: a polling loop that
//! absorbs rendering latency and animation without fixed sleeps. One policy
//! value is attached to a session and can be overridden per call.

use std::time::{Duration, Instant};

use crate::result::ComprobarResult;

/// Default wait budget for element resolution (20 seconds)
pub const DEFAULT_WAIT_MS: u64 = 20_000;

/// Short wait budget for visibility probes (5 seconds)
pub const SHORT_WAIT_MS: u64 = 5_000;

/// Per-attempt wait budget for positional confirmation retries (2 seconds)
pub const CONFIRM_WAIT_MS: u64 = 2_000;

/// Default polling interval (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// A duration bound attached to element operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    /// Total wait budget
    pub timeout: Duration,
    /// Interval between polls
    pub poll_interval: Duration,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_WAIT_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

impl WaitPolicy {
    /// Create a policy with a custom timeout and the default poll interval
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }

    /// Short policy used for visibility probes
    #[must_use]
    pub fn short() -> Self {
        Self::new(Duration::from_millis(SHORT_WAIT_MS))
    }

    /// Per-attempt policy used inside confirmation retry loops
    #[must_use]
    pub fn confirm() -> Self {
        Self::new(Duration::from_millis(CONFIRM_WAIT_MS))
    }

    /// Override the poll interval
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Timeout in milliseconds, for error reporting
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }
}

/// Poll `probe` until it yields a value or the policy's budget elapses.
///
/// The probe runs at least once, so a condition that is already satisfied
/// resolves on the first poll even with a zero timeout. Probe errors
/// propagate immediately; `Ok(None)` on return means the budget elapsed
/// without the condition being met — the caller decides whether that is a
/// failure (`find_one`) or a valid outcome (`is_visible`).
pub fn poll_until<T>(
    policy: WaitPolicy,
    mut probe: impl FnMut() -> ComprobarResult<Option<T>>,
) -> ComprobarResult<Option<T>> {
    let start = Instant::now();
    loop {
        if let Some(value) = probe()? {
            return Ok(Some(value));
        }
        if start.elapsed() >= policy.timeout {
            return Ok(None);
        }
        std::thread::sleep(policy.poll_interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod policy_tests {
        use super::*;

        #[test]
        fn test_default_policy() {
            let policy = WaitPolicy::default();
            assert_eq!(policy.timeout, Duration::from_millis(DEFAULT_WAIT_MS));
            assert_eq!(
                policy.poll_interval,
                Duration::from_millis(DEFAULT_POLL_INTERVAL_MS)
            );
        }

        #[test]
        fn test_short_and_confirm_policies() {
            assert_eq!(WaitPolicy::short().timeout_ms(), SHORT_WAIT_MS);
            assert_eq!(WaitPolicy::confirm().timeout_ms(), CONFIRM_WAIT_MS);
        }

        #[test]
        fn test_with_poll_interval() {
            let policy = WaitPolicy::default().with_poll_interval(Duration::from_millis(10));
            assert_eq!(policy.poll_interval, Duration::from_millis(10));
        }
    }

    mod poll_tests {
        use super::*;

        #[test]
        fn test_immediate_success() {
            let result = poll_until(WaitPolicy::new(Duration::from_millis(100)), || {
                Ok(Some(42))
            });
            assert_eq!(result.unwrap(), Some(42));
        }

        #[test]
        fn test_probe_runs_once_with_zero_timeout() {
            let mut calls = 0;
            let result = poll_until(WaitPolicy::new(Duration::ZERO), || {
                calls += 1;
                Ok(Some(calls))
            });
            assert_eq!(result.unwrap(), Some(1));
        }

        #[test]
        fn test_timeout_yields_none() {
            let policy =
                WaitPolicy::new(Duration::from_millis(60)).with_poll_interval(Duration::from_millis(10));
            let result: ComprobarResult<Option<()>> = poll_until(policy, || Ok(None));
            assert_eq!(result.unwrap(), None);
        }

        #[test]
        fn test_condition_becomes_true() {
            let mut calls = 0;
            let policy = WaitPolicy::new(Duration::from_millis(500))
                .with_poll_interval(Duration::from_millis(5));
            let result = poll_until(policy, || {
                calls += 1;
                Ok((calls >= 3).then_some(calls))
            });
            assert_eq!(result.unwrap(), Some(3));
        }

        #[test]
        fn test_probe_error_propagates() {
            let result: ComprobarResult<Option<()>> =
                poll_until(WaitPolicy::new(Duration::from_millis(100)), || {
                    Err(crate::result::ComprobarError::session("wire closed"))
                });
            assert!(result.is_err());
        }
    }
}
