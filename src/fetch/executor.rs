//! Resilient request executor.
//!
//! Runs one logical call as `ATTEMPT -> {SUCCESS, RETRY -> ATTEMPT, FAIL}`.
//! The whole call (every attempt, bucket wait and backoff sleep) is one entry
//! in the client's request queue.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, warn};
use serde_json::Value;
use tokio::time::Instant;

use super::request::RequestDescriptor;
use super::transport::{Transport, TransportResponse};
use crate::config::{BucketSettings, RetryPolicy, HTTP_STATUS_NOT_FOUND};
use crate::error_handling::{
    backoff_delay, classify_status, parse_retry_after, ApiError, ResponseClass,
};
use crate::queue::RequestQueue;
use crate::rate_limiter::TokenBucket;
use crate::utils::{duration_to_ms, new_trace_id, sanitize_and_truncate_error_message};

/// What to do after one attempt.
enum Step {
    Done(Result<Value, ApiError>),
    RetryAfter(Duration),
}

struct Shared {
    transport: Arc<dyn Transport>,
    bucket: TokenBucket,
    policy: RetryPolicy,
}

/// Throttled, retrying executor over a [`Transport`].
///
/// Owns the token bucket and the request queue of one client instance. Must
/// be created inside a Tokio runtime.
pub struct Executor {
    shared: Arc<Shared>,
    queue: RequestQueue,
}

impl Executor {
    pub fn new(transport: Arc<dyn Transport>, bucket: BucketSettings, policy: RetryPolicy) -> Self {
        Executor {
            shared: Arc::new(Shared {
                transport,
                bucket: TokenBucket::new(bucket),
                policy,
            }),
            queue: RequestQueue::new(),
        }
    }

    /// Executes one logical call and returns the parsed JSON body.
    ///
    /// An empty 2xx body yields `Value::Null`.
    ///
    /// # Errors
    ///
    /// - `RateLimitExceeded` once 429 answers exhaust the rate-limit attempts
    /// - `TransientServerError` once 5xx answers exhaust the server-error attempts
    /// - `ClientRequestError` immediately on any other non-2xx status
    /// - `NetworkError` once connection failures exhaust the network attempts
    /// - `MalformedResponse` if a 2xx body is not JSON
    pub async fn execute(&self, descriptor: RequestDescriptor) -> Result<Value, ApiError> {
        let shared = Arc::clone(&self.shared);
        self.queue
            .enqueue(async move { shared.run(descriptor).await })
            .await?
    }

    /// Calls currently waiting in or running from the queue.
    pub fn queue_depth(&self) -> usize {
        self.queue.depth()
    }

    /// Tokens currently available in the bucket.
    pub fn available_tokens(&self) -> f64 {
        self.shared.bucket.available()
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.shared.policy
    }
}

impl Shared {
    async fn run(&self, mut descriptor: RequestDescriptor) -> Result<Value, ApiError> {
        let trace_id = new_trace_id();
        let call_start = Instant::now();

        loop {
            self.bucket.acquire().await;

            debug!(
                "[API-TRACE {}] START {} {} | Attempt: {}",
                trace_id,
                descriptor.method,
                descriptor.path,
                descriptor.attempt + 1
            );
            let attempt_start = Instant::now();
            let sent = self.transport.send(&descriptor).await;
            let elapsed_ms = duration_to_ms(attempt_start.elapsed());

            let step = match sent {
                Ok(response) => {
                    debug!(
                        "[API-TRACE {}] Response: {} | Duration: {}ms | Attempt: {}",
                        trace_id,
                        response.status,
                        elapsed_ms,
                        descriptor.attempt + 1
                    );
                    self.on_response(&trace_id, &descriptor, response)
                }
                Err(err) => {
                    let attempts = descriptor.attempt + 1;
                    if err.is_retriable() && attempts < self.policy.network_error_max_attempts {
                        let wait = backoff_delay(&self.policy, descriptor.attempt);
                        warn!(
                            "[API-TRACE {}] Network error on {} {}: {} | Duration: {}ms | retrying in {}ms (attempt {}/{})",
                            trace_id,
                            descriptor.method,
                            descriptor.path,
                            err,
                            elapsed_ms,
                            duration_to_ms(wait),
                            attempts,
                            self.policy.network_error_max_attempts
                        );
                        Step::RetryAfter(wait)
                    } else {
                        Step::Done(Err(ApiError::NetworkError {
                            attempts,
                            source: err,
                        }))
                    }
                }
            };

            match step {
                Step::Done(result) => {
                    let total_ms = duration_to_ms(call_start.elapsed());
                    match &result {
                        Ok(_) => debug!(
                            "[API-TRACE {}] SUCCESS | Total duration: {}ms",
                            trace_id, total_ms
                        ),
                        Err(err) => error!(
                            "[API-TRACE {}] FAILED {} {} after {}ms: {}",
                            trace_id,
                            descriptor.method,
                            descriptor.path,
                            total_ms,
                            err
                        ),
                    }
                    return result;
                }
                Step::RetryAfter(wait) => {
                    tokio::time::sleep(wait).await;
                    descriptor.attempt += 1;
                }
            }
        }
    }

    fn on_response(
        &self,
        trace_id: &str,
        descriptor: &RequestDescriptor,
        response: TransportResponse,
    ) -> Step {
        let attempts = descriptor.attempt + 1;
        match classify_status(response.status) {
            ResponseClass::Success => Step::Done(parse_body(&descriptor.path, &response.body)),
            ResponseClass::RateLimited => {
                if attempts >= self.policy.rate_limit_max_attempts {
                    return Step::Done(Err(ApiError::RateLimitExceeded { attempts }));
                }
                let wait = response
                    .retry_after
                    .as_deref()
                    .and_then(|value| parse_retry_after(value, chrono::Utc::now()))
                    .map(|wait| wait.min(self.policy.max_retry_after))
                    .unwrap_or_else(|| backoff_delay(&self.policy, descriptor.attempt));
                warn!(
                    "[API-TRACE {}] Rate limited (429). Waiting {}ms before retry (attempt {}/{})",
                    trace_id,
                    duration_to_ms(wait),
                    attempts,
                    self.policy.rate_limit_max_attempts
                );
                Step::RetryAfter(wait)
            }
            ResponseClass::ServerError => {
                if attempts >= self.policy.server_error_max_attempts {
                    return Step::Done(Err(ApiError::TransientServerError {
                        status: response.status,
                        body: sanitize_and_truncate_error_message(&response.body),
                        attempts,
                    }));
                }
                let wait = backoff_delay(&self.policy, descriptor.attempt);
                warn!(
                    "[API-TRACE {}] Upstream error {}, retrying in {}ms (attempt {}/{})",
                    trace_id,
                    response.status,
                    duration_to_ms(wait),
                    attempts,
                    self.policy.server_error_max_attempts
                );
                Step::RetryAfter(wait)
            }
            ResponseClass::ClientError => {
                if response.status == HTTP_STATUS_NOT_FOUND {
                    error!(
                        "[API-TRACE {}] Upstream 404: resource not found at {}",
                        trace_id,
                        descriptor.path
                    );
                }
                Step::Done(Err(ApiError::ClientRequestError {
                    status: response.status,
                    body: sanitize_and_truncate_error_message(&response.body),
                }))
            }
        }
    }
}

/// Parses a successful body, warning on suspicious empty payloads.
fn parse_body(path: &str, body: &str) -> Result<Value, ApiError> {
    if body.trim().is_empty() {
        warn!("Empty response from upstream for {}", path);
        return Ok(Value::Null);
    }
    let value: Value = serde_json::from_str(body).map_err(|e| ApiError::MalformedResponse {
        path: path.to_string(),
        reason: e.to_string(),
    })?;
    if matches!(&value, Value::Object(map) if map.is_empty()) {
        warn!("Empty response from upstream for {}", path);
    }
    Ok(value)
}
