//! ats_client library: rate-limited, retrying client for an ATS REST API
//!
//! Every upstream call made through one [`AtsClient`] goes through a single
//! FIFO request queue and a token bucket, is retried according to its failure
//! class (429, 5xx, network), and list operations are merged across pages
//! with explicit completeness metadata.
//!
//! # Example
//!
//! ```no_run
//! use ats_client::initialization::init_client;
//! use ats_client::{ClientConfig, CollectLimits, OpportunityFilter};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig {
//!     api_key: std::env::var("LEVER_API_KEY")?,
//!     ..Default::default()
//! };
//! let client = init_client(&config)?;
//!
//! let candidates = client
//!     .list_opportunities(&OpportunityFilter::default(), CollectLimits::default(), None)
//!     .await?;
//! println!("{} candidates", candidates.items.len());
//! if let Some(note) = candidates.completeness_note() {
//!     println!("{note}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime: constructing a client spawns its
//! request queue consumer.

pub mod client;
pub mod config;
pub mod error_handling;
pub mod fetch;
pub mod initialization;
pub mod pagination;
mod queue;
mod rate_limiter;
mod utils;

// Re-export public API
pub use client::{
    ArchiveRequest, ArchivedFilter, AtsClient, Opportunity, OpportunityFilter, Posting,
    PostingFilter, RequisitionFilter, ResourceOutcome,
};
pub use config::{BucketSettings, ClientConfig, LogFormat, LogLevel, RetryPolicy};
pub use error_handling::{ApiError, ErrorKind, InitializationError, TransportError};
pub use fetch::{Executor, RequestDescriptor, ReqwestTransport, Transport, TransportResponse};
pub use pagination::{Aggregator, CollectLimits, CollectStats, Collected, ExhaustionReason, PageQuery};
