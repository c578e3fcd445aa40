//! Configuration management.
//!
//! This module provides:
//! - Default constants for throttling, retries, pagination and HTTP timeouts
//! - Configuration types (log settings, bucket sizing, retry policy, client config)
//! - Command-line options for the binary

mod cli;
mod constants;
mod types;

// Re-export public API
pub use cli::{Cli, Command, LimitArgs};
pub use constants::*;
pub use types::{BucketSettings, ClientConfig, LogFormat, LogLevel, RetryPolicy};
