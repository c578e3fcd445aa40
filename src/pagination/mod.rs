//! Paginated aggregation.
//!
//! This module provides:
//! - The page envelope and the query/cursor pairing used to request pages
//! - Stop conditions and the merged, honestly-labelled result
//! - The aggregation loop shared by every list operation

mod aggregator;
mod types;

pub use aggregator::Aggregator;
pub use types::{CollectLimits, CollectStats, Collected, ExhaustionReason, Page, PageQuery};
