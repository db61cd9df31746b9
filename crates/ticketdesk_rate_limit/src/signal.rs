//! Parsing of 429 response bodies.

use derive_getters::Getters;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Cooldown instructions carried by a 429 response.
///
/// Discord sends `{"message": "...", "retry_after": 1.5, "global": false}`.
/// Missing or malformed fields fall back independently: `retry_after` to the
/// caller's default, `global` to `false`. Negative cooldowns are treated as
/// zero.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use ticketdesk_rate_limit::RateLimitSignal;
///
/// let body = br#"{"message":"You are being rate limited.","retry_after":0.25,"global":true}"#;
/// let signal = RateLimitSignal::from_body(body, Duration::from_secs(5));
/// assert!(*signal.global());
/// assert_eq!(*signal.retry_after(), Duration::from_millis(250));
///
/// let fallback = RateLimitSignal::from_body(b"<html>", Duration::from_secs(5));
/// assert!(!*fallback.global());
/// assert_eq!(*fallback.retry_after(), Duration::from_secs(5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters)]
pub struct RateLimitSignal {
    /// How long to hold off
    retry_after: Duration,
    /// Whether the cooldown applies to every route
    global: bool,
}

impl RateLimitSignal {
    /// Creates a signal directly.
    pub fn new(retry_after: Duration, global: bool) -> Self {
        Self {
            retry_after,
            global,
        }
    }

    /// Reads the signal from a raw 429 body.
    pub fn from_body(body: &[u8], default_retry_after: Duration) -> Self {
        let parsed: Option<Value> = serde_json::from_slice(body).ok();
        if parsed.is_none() {
            debug!("Rate limit body is not JSON, using defaults");
        }

        let retry_after = parsed
            .as_ref()
            .and_then(|v| v.get("retry_after"))
            .and_then(Value::as_f64)
            .and_then(|secs| Duration::try_from_secs_f64(secs.max(0.0)).ok())
            .unwrap_or(default_retry_after);

        let global = parsed
            .as_ref()
            .and_then(|v| v.get("global"))
            .and_then(Value::as_bool)
            .unwrap_or(false);

        Self {
            retry_after,
            global,
        }
    }
}
