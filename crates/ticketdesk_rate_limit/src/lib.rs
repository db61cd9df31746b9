//! Rate limiting and retry policy for Discord REST calls.
//!
//! This crate holds the pieces of the request pipeline that do not touch
//! HTTP directly:
//! - [`GlobalRateLimit`] - the process-wide cooldown gate every caller waits on
//!   after Discord reports a global rate limit
//! - [`RetryPolicy`] - retry budget and backoff schedule
//! - [`ResponseClass`] - how each status code is treated
//! - [`RateLimitSignal`] - the `retry_after`/`global` pair parsed from a 429 body
//!
//! ```
//! use std::time::Duration;
//! use ticketdesk_rate_limit::{ResponseClass, RetryPolicy};
//!
//! let policy = RetryPolicy::default();
//! assert_eq!(policy.backoff(1), Duration::from_secs(6));
//! assert_eq!(ResponseClass::of(503), ResponseClass::RetryableServerError);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod gate;
mod policy;
mod signal;

pub use gate::GlobalRateLimit;
pub use policy::{
    DEFAULT_BACKOFF_BASE, DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_AFTER, RETRYABLE_SERVER_STATUSES,
    ResponseClass, RetryPolicy, RetryPolicyBuilder,
};
pub use signal::RateLimitSignal;
