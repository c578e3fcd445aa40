//! Configuration types.
//!
//! This module defines the enums and structs used to configure the client,
//! both programmatically and from the command line.

use std::time::Duration;

use clap::ValueEnum;

use crate::config::constants::*;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Token bucket sizing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BucketSettings {
    /// Maximum tokens held (burst allowance)
    pub capacity: u32,
    /// Tokens added per second
    pub refill_per_second: f64,
}

impl Default for BucketSettings {
    fn default() -> Self {
        Self {
            capacity: BUCKET_CAPACITY,
            refill_per_second: BUCKET_REFILL_PER_SECOND,
        }
    }
}

/// Retry limits and backoff shape for the request executor.
///
/// Attempt limits count the initial attempt, so `rate_limit_max_attempts = 3`
/// means one request plus two retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts while the upstream answers 429
    pub rate_limit_max_attempts: u32,
    /// Total attempts while the upstream answers 5xx
    pub server_error_max_attempts: u32,
    /// Total attempts while the connection itself fails
    pub network_error_max_attempts: u32,
    /// Delay before the first retry; doubles on each subsequent one
    pub initial_delay: Duration,
    /// Ceiling applied to every backoff delay
    pub max_delay: Duration,
    /// Ceiling applied to a `Retry-After` wait
    pub max_retry_after: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            rate_limit_max_attempts: RATE_LIMIT_MAX_ATTEMPTS,
            server_error_max_attempts: SERVER_ERROR_MAX_ATTEMPTS,
            network_error_max_attempts: NETWORK_ERROR_MAX_ATTEMPTS,
            initial_delay: Duration::from_millis(RETRY_INITIAL_DELAY_MS),
            max_delay: Duration::from_millis(RETRY_MAX_DELAY_MS),
            max_retry_after: Duration::from_secs(RETRY_AFTER_MAX_SECS),
        }
    }
}

/// Library configuration (no CLI dependencies).
///
/// One configuration describes one upstream credential. Each
/// [`AtsClient`](crate::AtsClient) built from it owns its own token bucket and
/// request queue.
///
/// # Examples
///
/// ```no_run
/// use ats_client::ClientConfig;
///
/// let config = ClientConfig {
///     api_key: "secret".to_string(),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Upstream API root, e.g. `https://api.lever.co/v1`
    pub base_url: String,

    /// Static bearer token
    pub api_key: String,

    /// Throughput limits
    pub bucket: BucketSettings,

    /// Retry limits and backoff
    pub retry: RetryPolicy,

    /// Overall HTTP request timeout
    pub http_timeout: Duration,

    /// TCP connect timeout
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            bucket: BucketSettings::default(),
            retry: RetryPolicy::default(),
            http_timeout: Duration::from_secs(HTTP_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(TCP_CONNECT_TIMEOUT_SECS),
        }
    }
}
