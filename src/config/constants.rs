//! Configuration constants.
//!
//! This module defines the defaults used throughout the client: throttling,
//! retry, pagination and HTTP timeouts. Every value here can be overridden
//! through [`ClientConfig`](super::ClientConfig).

use std::time::Duration;

/// Default upstream API root (Lever v1).
pub const DEFAULT_BASE_URL: &str = "https://api.lever.co/v1";

/// Environment variable holding the upstream API key.
pub const API_KEY_ENV: &str = "LEVER_API_KEY";

// Token bucket
/// Burst allowance of the token bucket.
pub const BUCKET_CAPACITY: u32 = 15;
/// Steady refill rate in tokens per second.
/// The upstream enforces roughly 10 requests/second; 8 leaves headroom.
pub const BUCKET_REFILL_PER_SECOND: f64 = 8.0;

// Retry strategy
/// Total attempts (initial + retries) when the upstream keeps answering 429.
pub const RATE_LIMIT_MAX_ATTEMPTS: u32 = 3;
/// Total attempts when the upstream keeps answering 5xx.
pub const SERVER_ERROR_MAX_ATTEMPTS: u32 = 2;
/// Total attempts when the connection itself fails.
pub const NETWORK_ERROR_MAX_ATTEMPTS: u32 = 2;
/// Delay before the first retry, in milliseconds. Doubles on every attempt.
pub const RETRY_INITIAL_DELAY_MS: u64 = 1000;
/// Factor by which the retry delay is multiplied on each attempt.
pub const RETRY_FACTOR: u64 = 2;
/// Ceiling on any single backoff delay, in milliseconds.
pub const RETRY_MAX_DELAY_MS: u64 = 30_000;
/// Ceiling on a wait requested through `Retry-After`, in seconds.
/// Every queued call waits behind the one sleeping.
pub const RETRY_AFTER_MAX_SECS: u64 = 60;

// Pagination
/// Largest page the upstream will serve.
pub const MAX_PAGE_SIZE: u32 = 100;
/// Page size used by list operations unless overridden.
pub const DEFAULT_PAGE_SIZE: u32 = 100;
/// Extra pause between consecutive page requests of one collection.
/// Observed upstream enforcement is burstier than the documented limit.
pub const INTER_PAGE_DELAY: Duration = Duration::from_millis(200);
/// Ceiling on upstream calls made by one collection (platform subrequest budget is 50).
pub const DEFAULT_MAX_CALLS: u32 = 45;
/// Wall-clock budget for one collection.
pub const DEFAULT_COLLECT_TIMEOUT: Duration = Duration::from_secs(25);
/// Default number of items a collection aims for.
pub const DEFAULT_MAX_ITEMS: usize = 1000;

// HTTP transport
/// Overall per-request timeout applied by the reqwest client.
pub const HTTP_TIMEOUT_SECS: u64 = 30;
/// TCP connect timeout applied by the reqwest client.
pub const TCP_CONNECT_TIMEOUT_SECS: u64 = 10;

// HTTP status codes (for clarity and consistency)
pub const HTTP_STATUS_TOO_MANY_REQUESTS: u16 = 429;
pub const HTTP_STATUS_NOT_FOUND: u16 = 404;

// Error payload limits
/// Maximum upstream error body length carried in an error (2000 chars).
/// Longer bodies are truncated with a note about the original length.
pub const MAX_ERROR_BODY_LENGTH: usize = 2000;
