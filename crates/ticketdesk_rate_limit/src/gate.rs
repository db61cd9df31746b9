//! Process-wide global rate-limit gate.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, instrument, warn};

/// Roughly 30 years; used when a cooldown would overflow `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Shared cooldown that applies to every request made with one bot token.
///
/// Discord flags some 429 responses as `global`: no request from the token
/// may be sent until the cooldown ends. The gate stores that deadline under a
/// single lock. Callers wait on the deadline itself rather than on the lock,
/// so every waiter wakes at the same instant and nobody polls.
///
/// One gate must be shared (via [`Arc`]) by every client using the same
/// token, otherwise callers can bypass each other's cooldowns.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use ticketdesk_rate_limit::GlobalRateLimit;
///
/// let gate = GlobalRateLimit::shared();
/// assert!(gate.remaining().is_none());
///
/// gate.record(Duration::from_secs(2));
/// assert!(gate.remaining().is_some());
/// ```
#[derive(Debug, Default)]
pub struct GlobalRateLimit {
    reset_at: Mutex<Option<Instant>>,
}

impl GlobalRateLimit {
    /// Creates an open gate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an open gate ready to be handed to several clients.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    fn lock(&self) -> MutexGuard<'_, Option<Instant>> {
        // The guarded value is a plain deadline; a panic elsewhere cannot leave it torn.
        self.reset_at.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The active cooldown deadline, if it has not passed yet.
    pub fn deadline(&self) -> Option<Instant> {
        let mut reset_at = self.lock();
        match *reset_at {
            Some(at) if at > Instant::now() => Some(at),
            Some(_) => {
                *reset_at = None;
                None
            }
            None => None,
        }
    }

    /// Time left on the active cooldown.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline()
            .map(|at| at.saturating_duration_since(Instant::now()))
    }

    /// Starts (or extends) a global cooldown of `retry_after` from now.
    ///
    /// A cooldown is never shortened: if a later deadline is already set it
    /// is kept. Returns the deadline now in force.
    #[instrument(skip(self), fields(retry_after_ms = retry_after.as_millis() as u64))]
    pub fn record(&self, retry_after: Duration) -> Instant {
        let now = Instant::now();
        let candidate = now
            .checked_add(retry_after)
            .unwrap_or_else(|| now + FAR_FUTURE);

        let mut reset_at = self.lock();
        let deadline = match *reset_at {
            Some(existing) if existing > candidate => existing,
            _ => candidate,
        };
        *reset_at = Some(deadline);
        warn!("Global rate limit engaged");
        deadline
    }

    /// Waits until no global cooldown is active.
    ///
    /// Returns immediately when the gate is open. If the deadline is
    /// extended while waiting, the wait continues to the new deadline.
    /// Returns the time spent waiting.
    pub async fn wait(&self) -> Duration {
        let started = Instant::now();
        while let Some(deadline) = self.deadline() {
            debug!(
                wait_ms = deadline.saturating_duration_since(Instant::now()).as_millis() as u64,
                "Global rate limit active, waiting"
            );
            sleep_until(deadline).await;
        }
        started.elapsed()
    }

    /// Records a cooldown and waits it out alongside every other caller.
    pub async fn engage(&self, retry_after: Duration) -> Duration {
        self.record(retry_after);
        let waited = self.wait().await;
        debug!("Global rate limit period ended, resuming requests");
        waited
    }
}
