//! Token-bucket rate limiting shared across blocking and async callers.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Bucket accounting, mutated under a single lock.
#[derive(Debug)]
struct BucketState {
    /// Fractional token balance, in `0.0..=capacity`.
    tokens: f64,
    /// When tokens were last accrued.
    last_refill: Instant,
}

/// A token bucket granting `capacity` calls per `period`.
///
/// Tokens accrue continuously at one per `period / capacity` and cap at
/// `capacity`. Acquisition never fails: when the bucket is empty the caller
/// waits exactly until the next token accrues. Share one instance across
/// operations via `Arc`; all accounting happens under one mutex, so
/// concurrent blocking and async callers never double-spend a token.
#[derive(Debug)]
pub struct RateLimit {
    capacity: u32,
    period: Duration,
    state: Mutex<BucketState>,
}

impl RateLimit {
    /// Create a bucket granting `capacity` calls per `period`, initially full.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero or `period` is zero.
    #[must_use]
    pub fn new(capacity: u32, period: Duration) -> Arc<Self> {
        assert!(capacity > 0, "rate limit capacity must be positive");
        assert!(!period.is_zero(), "rate limit period must be positive");
        Arc::new(Self {
            capacity,
            period,
            state: Mutex::new(BucketState {
                tokens: f64::from(capacity),
                last_refill: Instant::now(),
            }),
        })
    }

    /// Maximum number of calls per period.
    #[must_use]
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// The rate limit period.
    #[must_use]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Time to accrue one token.
    fn refill_interval(&self) -> Duration {
        self.period / self.capacity
    }

    /// Refill from elapsed time, then either consume a token (`None`) or
    /// report how long until the next token accrues (`Some(wait)`).
    fn try_acquire(&self) -> Option<Duration> {
        let mut state = self.state.lock();
        let now = Instant::now();
        let interval = self.refill_interval().as_secs_f64();

        let elapsed = now.duration_since(state.last_refill).as_secs_f64();
        state.tokens = (state.tokens + elapsed / interval).min(f64::from(self.capacity));
        state.last_refill = now;

        if state.tokens >= 1.0 {
            state.tokens -= 1.0;
            None
        } else {
            Some(Duration::from_secs_f64((1.0 - state.tokens) * interval))
        }
    }

    /// Acquire a token, blocking the calling thread until one is available.
    pub fn acquire(&self) {
        while let Some(wait) = self.try_acquire() {
            tracing::debug!(wait_ms = wait.as_millis() as u64, "rate limit reached");
            std::thread::sleep(wait);
        }
    }

    /// Acquire a token, suspending until one is available.
    ///
    /// Concurrently scheduled work keeps running while this waits.
    pub async fn acquire_async(&self) {
        while let Some(wait) = self.try_acquire() {
            tracing::debug!(wait_ms = wait.as_millis() as u64, "rate limit reached");
            tokio::time::sleep(wait).await;
        }
    }
}
