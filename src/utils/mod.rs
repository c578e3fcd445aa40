//! Utility functions.
//!
//! This module provides:
//! - Trace identifiers for correlating the log lines of one API call
//! - Duration conversion for log output
//! - Error body sanitization and truncation

pub mod sanitize;
mod trace;

pub use sanitize::sanitize_and_truncate_error_message;
pub use trace::{duration_to_ms, new_trace_id};
