//! Error handling and response categorization.
//!
//! This module provides:
//! - Error type definitions (initialization, transport, classified API errors)
//! - HTTP status categorization into retry classes
//! - Backoff schedule and `Retry-After` interpretation
//!
//! Errors crossing the facade boundary are always final: retries happen
//! inside the executor and never leak out as intermediate failures.

mod categorization;
mod types;

// Re-export public API
pub use categorization::{
    backoff_delay, backoff_schedule, classify_status, parse_retry_after, ResponseClass,
};
pub use types::{ApiError, ErrorKind, InitializationError, TransportError};
