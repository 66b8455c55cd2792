//! Quiet-period debouncing for typed search input.
//!
//! Every [`Debouncer::push`] replaces the pending value and restarts the timer.
//! [`Debouncer::ready`] resolves with the last value once nothing new has arrived
//! for the configured delay. Superseded values are dropped, never queued.

use std::time::Duration;

use tokio::time::{Instant, sleep_until};

pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn push(&mut self, value: T) {
        self.pending = Some((value, Instant::now() + self.delay));
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop whatever is pending without emitting it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Wait for the pending value to settle. Pends forever while nothing is pending.
    ///
    /// Cancel-safe: the value is only taken after the deadline has passed, so
    /// dropping this future inside `select!` loses nothing.
    pub async fn ready(&mut self) -> T {
        loop {
            let deadline = match &self.pending {
                Some((_, deadline)) => *deadline,
                None => std::future::pending().await,
            };

            sleep_until(deadline).await;

            // A push between polls may have moved the deadline.
            let settled =
                matches!(&self.pending, Some((_, current)) if *current <= Instant::now());
            if settled && let Some((value, _)) = self.pending.take() {
                return value;
            }
        }
    }
}
