//! Process-wide request throttle.
//!
//! Hyperliquid enforces its rate ceiling across the whole account/IP, so
//! per-client limiters would under-throttle as soon as the dashboard layer
//! fetches several wallets concurrently. One `RateLimiter` is constructed at
//! startup and handed (as an `Arc`) to every client.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};

/// Shared throttle enforcing a minimum interval between outbound requests.
///
/// `acquire` grants are strictly serialized: no two callers ever proceed
/// closer together than `min_interval`, regardless of which tasks or threads
/// they run on.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_grant: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Create a limiter with an explicit minimum interval between grants.
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_grant: Mutex::new(None),
        }
    }

    /// Create a limiter allowing `calls` requests per second.
    pub fn per_second(calls: u32) -> Self {
        Self::new(Duration::from_secs(1) / calls.max(1))
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Wait until at least `min_interval` has elapsed since the previous
    /// grant anywhere in the process, then take the grant.
    ///
    /// The lock is held across the sleep: a second caller must not observe
    /// `last_grant` until this grant's interval has actually elapsed,
    /// otherwise two callers could both compute a zero wait.
    pub async fn acquire(&self) {
        let mut last = self.last_grant.lock().await;
        if let Some(prev) = *last {
            let ready = prev + self.min_interval;
            let now = Instant::now();
            if ready > now {
                sleep(ready - now).await;
            }
        }
        *last = Some(Instant::now());
    }
}
