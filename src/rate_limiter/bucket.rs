//! Token bucket implementation.

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use tokio::time::Instant;

use crate::config::BucketSettings;

/// Smallest refill rate accepted; protects the wait computation from dividing by zero.
const MIN_REFILL_PER_SECOND: f64 = 0.001;

#[derive(Debug)]
struct BucketState {
    tokens: f64,
    last_refill: Instant,
}

/// Token bucket with continuous refill.
///
/// Invariant: `0 <= tokens <= capacity` at every observation. Tokens grow by
/// `elapsed × refill_per_second` between observations and shrink by exactly
/// one per grant. Waiting is computed, not polled: a caller short of a token
/// sleeps exactly as long as one token takes to accumulate, then re-checks.
///
/// Uses `tokio::time::Instant`, so tests can drive it with a paused clock.
#[derive(Debug)]
pub struct TokenBucket {
    capacity: f64,
    refill_per_second: f64,
    state: Mutex<BucketState>,
}

impl TokenBucket {
    /// Creates a full bucket.
    ///
    /// A capacity below one is raised to one; a non-positive refill rate is
    /// raised to a tiny positive rate.
    pub fn new(settings: BucketSettings) -> Self {
        let capacity = f64::from(settings.capacity.max(1));
        let refill_per_second = if settings.refill_per_second.is_finite() {
            settings.refill_per_second.max(MIN_REFILL_PER_SECOND)
        } else {
            MIN_REFILL_PER_SECOND
        };
        TokenBucket {
            capacity,
            refill_per_second,
            state: Mutex::new(BucketState {
                tokens: capacity,
                last_refill: Instant::now(),
            }),
        }
    }

    /// Waits until a token is available, then takes it.
    ///
    /// Never fails, only delays.
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut state = self.lock_state();
                self.refill(&mut state);
                if state.tokens >= 1.0 {
                    state.tokens -= 1.0;
                    return;
                }
                Duration::from_secs_f64((1.0 - state.tokens) / self.refill_per_second)
            };
            log::trace!("Token bucket empty, waiting {:?}", wait);
            tokio::time::sleep(wait).await;
        }
    }

    /// Tokens currently available (after refilling for elapsed time).
    pub fn available(&self) -> f64 {
        let mut state = self.lock_state();
        self.refill(&mut state);
        state.tokens
    }

    /// Burst allowance.
    pub fn capacity(&self) -> u32 {
        self.capacity as u32
    }

    /// Steady refill rate in tokens per second.
    pub fn refill_per_second(&self) -> f64 {
        self.refill_per_second
    }

    fn refill(&self, state: &mut BucketState) {
        let now = Instant::now();
        let elapsed = now.duration_since(state.last_refill).as_secs_f64();
        state.tokens = (state.tokens + elapsed * self.refill_per_second).min(self.capacity);
        state.last_refill = now;
    }

    fn lock_state(&self) -> MutexGuard<'_, BucketState> {
        // The state is two plain numbers; a panic elsewhere cannot leave it torn.
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
