//! Cancellation and timeout guard shared by every phase of an extraction

use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Overall deadline of one extraction, combined with an external token
///
/// Loops poll [`Deadline::is_expired`] at every iteration boundary, and
/// network calls and sleeps are raced against it via [`Deadline::run`] so an
/// in-flight request never outlives the deadline.
#[derive(Debug, Clone)]
pub struct Deadline {
    token: CancellationToken,
    expires_at: Instant,
}

impl Deadline {
    /// Creates a deadline `timeout` from now, also tripped by `token`
    pub fn new(timeout: Duration, token: CancellationToken) -> Self {
        Self {
            token,
            expires_at: Instant::now() + timeout,
        }
    }

    /// True once the token is cancelled or the timeout has elapsed
    pub fn is_expired(&self) -> bool {
        self.token.is_cancelled() || Instant::now() >= self.expires_at
    }

    /// Time left before the timeout elapses
    pub fn remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }

    /// Drives `fut` to completion unless the deadline trips first
    ///
    /// Returns `None` when the deadline won the race; `fut` is dropped.
    pub async fn run<F>(&self, fut: F) -> Option<F::Output>
    where
        F: Future,
    {
        tokio::select! {
            biased;
            _ = self.token.cancelled() => None,
            _ = tokio::time::sleep_until(self.expires_at) => None,
            out = fut => Some(out),
        }
    }

    /// Sleeps for `duration`; returns false if the deadline interrupted it
    pub async fn sleep(&self, duration: Duration) -> bool {
        if duration.is_zero() {
            return !self.is_expired();
        }
        self.run(tokio::time::sleep(duration)).await.is_some()
    }
}
