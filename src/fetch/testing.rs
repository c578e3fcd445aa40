//! In-memory transports for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::time::Instant;

use super::request::RequestDescriptor;
use super::transport::{Transport, TransportResponse};
use crate::config::RetryPolicy;
use crate::error_handling::TransportError;

/// Retry policy with the default attempt limits and millisecond backoff.
pub(crate) fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        initial_delay: Duration::from_millis(10),
        max_delay: Duration::from_millis(100),
        ..RetryPolicy::default()
    }
}

#[derive(Clone)]
enum Scripted {
    Respond(TransportResponse),
    Fail(String),
}

impl Scripted {
    fn produce(&self) -> Result<TransportResponse, TransportError> {
        match self {
            Scripted::Respond(response) => Ok(response.clone()),
            Scripted::Fail(message) => Err(TransportError::Connection(message.clone())),
        }
    }
}

/// Transport replaying a script of answers, then a fallback answer forever.
pub(crate) struct ScriptedTransport {
    script: Mutex<VecDeque<Scripted>>,
    fallback: Option<Scripted>,
    latency: Duration,
    log: Mutex<Vec<(Instant, RequestDescriptor)>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        ScriptedTransport {
            script: Mutex::new(VecDeque::new()),
            fallback: None,
            latency: Duration::ZERO,
            log: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn then_response(self, response: TransportResponse) -> Self {
        self.script
            .lock()
            .unwrap()
            .push_back(Scripted::Respond(response));
        self
    }

    pub(crate) fn then_status(self, status: u16, body: &str) -> Self {
        self.then_response(TransportResponse::new(status, body))
    }

    pub(crate) fn then_json(self, status: u16, body: Value) -> Self {
        self.then_response(TransportResponse::json(status, &body))
    }

    pub(crate) fn then_failure(self, message: &str) -> Self {
        self.script
            .lock()
            .unwrap()
            .push_back(Scripted::Fail(message.to_string()));
        self
    }

    pub(crate) fn always_status(mut self, status: u16, body: &str) -> Self {
        self.fallback = Some(Scripted::Respond(TransportResponse::new(status, body)));
        self
    }

    pub(crate) fn always_json(mut self, status: u16, body: Value) -> Self {
        self.fallback = Some(Scripted::Respond(TransportResponse::json(status, &body)));
        self
    }

    pub(crate) fn always_failure(mut self, message: &str) -> Self {
        self.fallback = Some(Scripted::Fail(message.to_string()));
        self
    }

    pub(crate) fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.log.lock().unwrap().len()
    }

    pub(crate) fn requests(&self) -> Vec<RequestDescriptor> {
        self.log
            .lock()
            .unwrap()
            .iter()
            .map(|(_, request)| request.clone())
            .collect()
    }

    pub(crate) fn request_times(&self) -> Vec<Instant> {
        self.log.lock().unwrap().iter().map(|(at, _)| *at).collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &RequestDescriptor) -> Result<TransportResponse, TransportError> {
        self.log
            .lock()
            .unwrap()
            .push((Instant::now(), request.clone()));
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let next = self.script.lock().unwrap().pop_front();
        match next.or_else(|| self.fallback.clone()) {
            Some(answer) => answer.produce(),
            None => panic!("no scripted answer left for {} {}", request.method, request.path),
        }
    }
}

/// Transport serving a fixed collection through `limit`/`offset` pages.
///
/// Items are `{"id": "item-<n>", "n": <n>}`. The cursor is the decimal index
/// of the next item.
pub(crate) struct PagedTransport {
    total: usize,
    latency: Duration,
    log: Mutex<Vec<RequestDescriptor>>,
}

impl PagedTransport {
    pub(crate) fn new(total: usize) -> Self {
        PagedTransport {
            total,
            latency: Duration::ZERO,
            log: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub(crate) fn requests(&self) -> Vec<RequestDescriptor> {
        self.log.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for PagedTransport {
    async fn send(&self, request: &RequestDescriptor) -> Result<TransportResponse, TransportError> {
        self.log.lock().unwrap().push(request.clone());
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let start: usize = request
            .query_value("offset")
            .map(|v| v.parse().unwrap())
            .unwrap_or(0);
        let limit: usize = request
            .query_value("limit")
            .map(|v| v.parse().unwrap())
            .unwrap_or(100);
        let end = (start + limit).min(self.total);
        let data: Vec<Value> = (start..end)
            .map(|n| json!({"id": format!("item-{n}"), "n": n}))
            .collect();
        let has_next = end < self.total;
        let mut body = json!({"data": data, "hasNext": has_next});
        if has_next {
            body["next"] = json!(end.to_string());
        }
        Ok(TransportResponse::json(200, &body))
    }
}
