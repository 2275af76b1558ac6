//! Restartable trailing-edge timer.
//!
//! [`Debouncer`] holds the most recent value pushed into it and releases
//! it once no new value has arrived for the whole window. Each push
//! restarts the window; there is no leading-edge release.

use std::time::Duration;

use tokio::time::{Instant, sleep_until};

#[derive(Debug)]
pub struct Debouncer<T> {
    window: Duration,
    pending: Option<(Instant, T)>,
}

impl<T> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Replace the pending value and restart the window.
    pub fn push(&mut self, value: T) {
        self.pending = Some((Instant::now() + self.window, value));
    }

    /// Discard the pending value without releasing it.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(_, v)| v)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending value will be released, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(at, _)| *at)
    }

    /// Wait for the window to elapse and take the pending value.
    ///
    /// Never resolves while nothing is pending. Cancel safe: dropping the
    /// future before it resolves leaves the pending value in place, so it
    /// can sit in a `select!` loop next to the input channel.
    pub async fn ready(&mut self) -> T {
        loop {
            let Some(deadline) = self.deadline() else {
                std::future::pending::<()>().await;
                continue;
            };
            sleep_until(deadline).await;

            if let Some((at, value)) = self.pending.take() {
                if at <= Instant::now() {
                    return value;
                }
                // Pushed again while we slept; wait out the new window
                self.pending = Some((at, value));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_releases_after_window() {
        let mut debouncer = Debouncer::new(Duration::from_millis(500));
        let start = Instant::now();
        debouncer.push("a");

        let value = debouncer.ready().await;
        assert_eq!(value, "a");
        assert_eq!(start.elapsed(), Duration::from_millis(500));
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_push_restarts_window_and_keeps_latest() {
        let mut debouncer = Debouncer::new(Duration::from_millis(500));
        let start = Instant::now();
        debouncer.push(1);
        tokio::time::sleep(Duration::from_millis(300)).await;
        debouncer.push(2);

        assert_eq!(debouncer.ready().await, 2);
        assert_eq!(start.elapsed(), Duration::from_millis(800));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_discards_pending() {
        let mut debouncer = Debouncer::new(Duration::from_millis(500));
        debouncer.push("stale");
        assert_eq!(debouncer.cancel(), Some("stale"));

        let fired = tokio::time::timeout(Duration::from_secs(5), debouncer.ready()).await;
        assert!(fired.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_wait_keeps_value() {
        let mut debouncer = Debouncer::new(Duration::from_millis(500));
        debouncer.push("kept");

        let early = tokio::time::timeout(Duration::from_millis(100), debouncer.ready()).await;
        assert!(early.is_err());
        assert!(debouncer.is_pending());
        assert_eq!(debouncer.ready().await, "kept");
    }
}
