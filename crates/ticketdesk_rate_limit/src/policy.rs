//! Retry budget, backoff schedule and status classification.

use derive_getters::Getters;
use std::time::Duration;

/// Attempts made for one request before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
/// First backoff after a transient server error.
pub const DEFAULT_BACKOFF_BASE: Duration = Duration::from_secs(3);
/// Cooldown assumed when a 429 body carries no usable `retry_after`.
pub const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(5);
/// Server errors that are retried with exponential backoff.
pub const RETRYABLE_SERVER_STATUSES: [u16; 4] = [500, 502, 503, 504];

/// How many times a request is attempted and how long to pause in between.
///
/// The backoff after a transient server error doubles with each attempt:
/// `backoff_base * 2^attempt_index`, so with the defaults the pauses are 3s
/// then 6s. No pause follows the final attempt.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use ticketdesk_rate_limit::RetryPolicy;
///
/// let policy = RetryPolicy::builder()
///     .max_attempts(4)
///     .backoff_base(Duration::from_millis(100))
///     .build();
///
/// assert_eq!(*policy.max_attempts(), 4);
/// assert_eq!(policy.backoff(2), Duration::from_millis(400));
/// assert!(policy.is_final_attempt(3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters)]
pub struct RetryPolicy {
    /// Total attempts, including the first (at least 1)
    max_attempts: u32,
    /// Backoff before the second attempt
    backoff_base: Duration,
    /// Used when a 429 response omits `retry_after`
    default_retry_after: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff_base: DEFAULT_BACKOFF_BASE,
            default_retry_after: DEFAULT_RETRY_AFTER,
        }
    }
}

impl RetryPolicy {
    /// Starts a builder seeded with the defaults.
    pub fn builder() -> RetryPolicyBuilder {
        RetryPolicyBuilder::default()
    }

    /// Pause after attempt `attempt_index` (zero-based) fails with a
    /// transient server error. Saturates instead of overflowing.
    pub fn backoff(&self, attempt_index: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt_index).unwrap_or(u32::MAX);
        self.backoff_base.saturating_mul(factor)
    }

    /// True when `attempt_index` is the last attempt allowed.
    pub fn is_final_attempt(&self, attempt_index: u32) -> bool {
        attempt_index + 1 >= self.max_attempts
    }
}

/// Builder for [`RetryPolicy`].
#[derive(Debug, Clone, Default)]
pub struct RetryPolicyBuilder {
    max_attempts: Option<u32>,
    backoff_base: Option<Duration>,
    default_retry_after: Option<Duration>,
}

impl RetryPolicyBuilder {
    /// Total attempts per request. Values below 1 are raised to 1.
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    /// Backoff before the second attempt.
    pub fn backoff_base(mut self, base: Duration) -> Self {
        self.backoff_base = Some(base);
        self
    }

    /// Cooldown assumed when a 429 omits `retry_after`.
    pub fn default_retry_after(mut self, retry_after: Duration) -> Self {
        self.default_retry_after = Some(retry_after);
        self
    }

    /// Builds the policy, filling unset values with the defaults.
    pub fn build(self) -> RetryPolicy {
        let defaults = RetryPolicy::default();
        RetryPolicy {
            max_attempts: self.max_attempts.unwrap_or(defaults.max_attempts).max(1),
            backoff_base: self.backoff_base.unwrap_or(defaults.backoff_base),
            default_retry_after: self
                .default_retry_after
                .unwrap_or(defaults.default_retry_after),
        }
    }
}

/// What the request pipeline does with a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ResponseClass {
    /// 2xx: parse the body and return it
    #[display("success")]
    Success,
    /// 500, 502, 503, 504: back off and retry
    #[display("retryable server error")]
    RetryableServerError,
    /// 429: honor `retry_after`, globally if flagged
    #[display("rate limited")]
    RateLimited,
    /// 403: fail immediately
    #[display("forbidden")]
    Forbidden,
    /// 404: fail immediately
    #[display("not found")]
    NotFound,
    /// Any other 5xx: fail immediately
    #[display("server error")]
    ServerError,
    /// Any other status: fail immediately
    #[display("client error")]
    ClientError,
}

impl ResponseClass {
    /// Classifies an HTTP status code.
    pub fn of(status: u16) -> Self {
        match status {
            200..=299 => ResponseClass::Success,
            429 => ResponseClass::RateLimited,
            403 => ResponseClass::Forbidden,
            404 => ResponseClass::NotFound,
            s if RETRYABLE_SERVER_STATUSES.contains(&s) => ResponseClass::RetryableServerError,
            500..=599 => ResponseClass::ServerError,
            _ => ResponseClass::ClientError,
        }
    }
}
