//! Synthetic estimate reveal
//!
//! Totals are computed instantly; revealing them is deliberately delayed to
//! convey calculation effort. The delay grows with how much of the catalog is
//! selected and carries a small random jitter. A pending reveal is a tokio
//! timer task that can be cancelled at any time.

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::{AbortHandle, JoinHandle};

/// Bounds of the reveal delay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimateDelay {
    pub min: Duration,
    pub max: Duration,
    pub jitter: Duration,
}

impl Default for EstimateDelay {
    fn default() -> Self {
        Self {
            min: Duration::from_millis(1200),
            max: Duration::from_millis(3500),
            jitter: Duration::from_millis(400),
        }
    }
}

impl EstimateDelay {
    pub fn new(min: Duration, max: Duration, jitter: Duration) -> Self {
        Self { min, max, jitter }
    }

    /// No delay at all, for scripted use
    pub fn instant() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO, Duration::ZERO)
    }

    /// `min + (max - min) * ratio + uniform(0..=jitter)`
    pub fn delay_for_ratio<R: Rng + ?Sized>(&self, ratio: f64, rng: &mut R) -> Duration {
        let ratio = if ratio.is_finite() {
            ratio.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let span = self.max.saturating_sub(self.min);
        let jitter_ms = u64::try_from(self.jitter.as_millis()).unwrap_or(u64::MAX);
        let jitter = Duration::from_millis(rng.random_range(0..=jitter_ms));

        self.min + span.mul_f64(ratio) + jitter
    }

    /// Delay for `selected` out of `total` catalog components
    pub fn delay_for<R: Rng + ?Sized>(
        &self,
        selected: usize,
        total: usize,
        rng: &mut R,
    ) -> Duration {
        let ratio = if total == 0 {
            0.0
        } else {
            selected as f64 / total as f64
        };
        self.delay_for_ratio(ratio, rng)
    }

    /// Upper bound of any delay this configuration can produce
    pub fn ceiling(&self) -> Duration {
        self.max.max(self.min) + self.jitter
    }
}

/// A value waiting to be revealed
#[derive(Debug)]
pub struct PendingEstimate<T> {
    receiver: Option<oneshot::Receiver<T>>,
    handle: JoinHandle<()>,
    delay: Duration,
}

impl<T: Send + 'static> PendingEstimate<T> {
    /// Reveal `value` after `delay`
    pub fn schedule(delay: Duration, value: T) -> Self {
        let (sender, receiver) = oneshot::channel();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = sender.send(value);
        });
        debug!("Scheduled estimate reveal in {:?}", delay);

        Self {
            receiver: Some(receiver),
            handle,
            delay,
        }
    }
}

impl<T> PendingEstimate<T> {
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Handle that cancels this reveal without owning it
    pub fn abort_handle(&self) -> AbortHandle {
        self.handle.abort_handle()
    }

    pub fn cancel(&self) {
        self.handle.abort();
    }

    /// Resolves to the value, or `None` if the reveal was cancelled
    pub async fn wait(mut self) -> Option<T> {
        let receiver = self.receiver.take()?;
        receiver.await.ok()
    }
}

impl<T> Drop for PendingEstimate<T> {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
