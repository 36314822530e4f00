use std::time::Duration;
use tokio::time::{Instant, sleep};

/// Fixed politeness delay between requests.
///
/// The interval runs from the moment the previous response body was fully
/// read, or the exchange failed.
#[derive(Debug)]
pub(crate) struct RateLimiter {
    last_response: Option<Instant>,
    min_interval: Duration,
}

impl RateLimiter {
    pub(crate) const fn new(min_interval: Duration) -> Self {
        Self {
            last_response: None,
            min_interval,
        }
    }

    /// Sleeps until the interval since the last response has elapsed.
    pub(crate) async fn wait(&self) {
        if let Some(last) = self.last_response {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                sleep(self.min_interval - elapsed).await;
            }
        }
    }

    /// Records the end of an exchange.
    pub(crate) fn mark(&mut self) {
        self.last_response = Some(Instant::now());
    }
}
