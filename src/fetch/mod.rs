//! Request execution.
//!
//! This module provides:
//! - The request descriptor describing one logical upstream call
//! - The transport seam and its reqwest implementation
//! - The throttled, retrying executor that every call goes through

mod executor;
mod request;
mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use executor::Executor;
pub use request::RequestDescriptor;
pub use transport::{ReqwestTransport, Transport, TransportResponse};
