//! HTTP client initialization.
//!
//! This module builds the reqwest client and the API client on top of it.

use std::sync::Arc;

use log::debug;
use reqwest::ClientBuilder;

use crate::client::AtsClient;
use crate::config::{ClientConfig, API_KEY_ENV};
use crate::error_handling::InitializationError;
use crate::fetch::ReqwestTransport;

/// Builds the reqwest client used by the transport.
///
/// Redirects are not followed: the upstream API never redirects, and a
/// redirect would otherwise be retried as if it were the resource.
///
/// # Errors
///
/// Returns `InitializationError::HttpClientError` if client creation fails.
pub fn init_http_client(config: &ClientConfig) -> Result<reqwest::Client, InitializationError> {
    let client = ClientBuilder::new()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(config.http_timeout)
        .connect_timeout(config.connect_timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// Builds an [`AtsClient`] talking to `config.base_url` over HTTPS.
///
/// Must be called inside a Tokio runtime.
///
/// # Errors
///
/// - `MissingApiKeyError` if `config.api_key` is empty
/// - `BaseUrlError` if `config.base_url` is not a URL
/// - `HttpClientError` if the reqwest client cannot be built
pub fn init_client(config: &ClientConfig) -> Result<AtsClient, InitializationError> {
    if config.api_key.trim().is_empty() {
        return Err(InitializationError::MissingApiKeyError(API_KEY_ENV));
    }
    let http = init_http_client(config)?;
    let transport = ReqwestTransport::new(http, &config.base_url, config.api_key.trim())?;
    debug!(
        "API client for {} ready: burst {}, {} req/s",
        config.base_url, config.bucket.capacity, config.bucket.refill_per_second
    );
    Ok(AtsClient::with_transport(Arc::new(transport), config))
}
