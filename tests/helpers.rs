// Shared test helpers for running the client against a local mock upstream.

#![allow(dead_code)] // Each test crate uses a different subset

use std::time::Duration;

use ats_client::initialization::init_client;
use ats_client::{AtsClient, ClientConfig, RetryPolicy};
use wiremock::MockServer;

/// Bearer token every test client sends.
pub const TEST_API_KEY: &str = "test-key";

/// Retry policy with the default attempt limits and short backoff.
pub fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        initial_delay: Duration::from_millis(20),
        max_delay: Duration::from_millis(100),
        ..RetryPolicy::default()
    }
}

/// Client configuration pointing at `base_url`.
pub fn test_config(base_url: &str) -> ClientConfig {
    ClientConfig {
        base_url: base_url.to_string(),
        api_key: TEST_API_KEY.to_string(),
        retry: fast_retry(),
        ..ClientConfig::default()
    }
}

/// Builds a client talking to `<server>/v1`.
pub fn client_for(server: &MockServer) -> AtsClient {
    init_client(&test_config(&format!("{}/v1", server.uri()))).expect("Failed to build test client")
}
