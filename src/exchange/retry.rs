//! Retry policy for individual API requests.
//!
//! Backoff is computed by a standalone policy object (attempt counter in,
//! wait duration out) rather than inside the request loop, so the timing
//! schedule can be tested without issuing requests or sleeping.

use std::time::Duration;

/// Classification of a failed request attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// The API signalled its rate ceiling (HTTP 429).
    RateLimited,
    /// Any other recoverable failure: transport error, non-2xx status.
    Transient,
}

/// What the request loop should do after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Wait for the given duration, then try again.
    Retry(Duration),
    /// Attempts exhausted; propagate the failure.
    GiveUp,
}

/// Backoff schedule for a single request.
///
/// Rate-limit responses back off exponentially: `backoff_unit * (2^attempt + 1)`,
/// i.e. 2s, 3s, 5s, 9s, ... at the default unit. Other transient failures
/// wait a short fixed delay.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts before giving up (first try included).
    pub max_attempts: u32,
    /// Base unit for the exponential rate-limit backoff.
    pub backoff_unit: Duration,
    /// Fixed delay after non-429 transient failures.
    pub transient_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            backoff_unit: Duration::from_secs(1),
            transient_delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// Decide what to do after attempt number `attempt` (zero-based) failed.
    pub fn decide(&self, attempt: u32, outcome: AttemptOutcome) -> RetryDecision {
        if attempt + 1 >= self.max_attempts {
            return RetryDecision::GiveUp;
        }
        let wait = match outcome {
            AttemptOutcome::RateLimited => {
                let factor = 2u32.saturating_pow(attempt).saturating_add(1);
                self.backoff_unit.saturating_mul(factor)
            }
            AttemptOutcome::Transient => self.transient_delay,
        };
        RetryDecision::Retry(wait)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_backoff_is_strictly_increasing() {
        let policy = RetryPolicy::default();
        let mut previous = Duration::ZERO;
        for attempt in 0..policy.max_attempts - 1 {
            match policy.decide(attempt, AttemptOutcome::RateLimited) {
                RetryDecision::Retry(wait) => {
                    assert!(wait > previous, "attempt {attempt} did not back off further");
                    previous = wait;
                }
                RetryDecision::GiveUp => panic!("gave up before max_attempts"),
            }
        }
    }

    #[test]
    fn test_rate_limit_backoff_schedule() {
        let policy = RetryPolicy::default();
        assert_eq!(
            policy.decide(0, AttemptOutcome::RateLimited),
            RetryDecision::Retry(Duration::from_secs(2))
        );
        assert_eq!(
            policy.decide(1, AttemptOutcome::RateLimited),
            RetryDecision::Retry(Duration::from_secs(3))
        );
        assert_eq!(
            policy.decide(2, AttemptOutcome::RateLimited),
            RetryDecision::Retry(Duration::from_secs(5))
        );
    }

    #[test]
    fn test_transient_delay_is_fixed() {
        let policy = RetryPolicy::default();
        assert_eq!(
            policy.decide(0, AttemptOutcome::Transient),
            RetryDecision::Retry(Duration::from_millis(500))
        );
        assert_eq!(
            policy.decide(2, AttemptOutcome::Transient),
            RetryDecision::Retry(Duration::from_millis(500))
        );
    }

    #[test]
    fn test_gives_up_at_max_attempts() {
        let policy = RetryPolicy::default();
        assert_eq!(
            policy.decide(4, AttemptOutcome::RateLimited),
            RetryDecision::GiveUp
        );
        assert_eq!(
            policy.decide(4, AttemptOutcome::Transient),
            RetryDecision::GiveUp
        );
    }

    #[test]
    fn test_single_attempt_policy_never_retries() {
        let policy = RetryPolicy {
            max_attempts: 1,
            ..RetryPolicy::default()
        };
        assert_eq!(
            policy.decide(0, AttemptOutcome::Transient),
            RetryDecision::GiveUp
        );
    }
}
