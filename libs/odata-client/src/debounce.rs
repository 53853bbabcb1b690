use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Collapses bursts of calls: after `settle().await` only the most recent
/// caller gets `true`.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    generation: AtomicU64,
}

impl Debouncer {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Wait out the quiet period. Returns `false` if another call arrived
    /// in the meantime.
    pub async fn settle(&self) -> bool {
        let mine = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.generation.load(Ordering::Acquire) == mine
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(Duration::from_millis(300))
    }
}
