//! Token-bucket throughput limiting.
//!
//! One [`TokenBucket`] exists per client instance (per upstream credential).
//! It bounds steady-state throughput to the refill rate while allowing short
//! bursts up to its capacity. Fairness between waiting callers is not its
//! concern: callers reach it one at a time through the request queue.

mod bucket;

pub use bucket::TokenBucket;
