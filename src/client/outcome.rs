//! Classification of single-resource responses.
//!
//! The upstream sometimes reports a miss as a successful `{data: {}}` or
//! `{data: null}`. Every single-resource response is classified here, once,
//! so no call site ever mistakes such a stand-in for a resource.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error_handling::ApiError;

/// Result of interpreting a `{data: T}` body.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceOutcome<T> {
    Found(T),
    /// No identifiable payload.
    Missing,
    /// A payload that is present but not a `T`.
    Malformed(String),
}

impl<T: DeserializeOwned> ResourceOutcome<T> {
    /// Classifies a parsed response body.
    pub fn classify(body: Value) -> Self {
        let data = match body {
            Value::Null => return ResourceOutcome::Missing,
            Value::Object(mut envelope) => match envelope.remove("data") {
                None | Some(Value::Null) => return ResourceOutcome::Missing,
                Some(data) => data,
            },
            other => {
                return ResourceOutcome::Malformed(format!(
                    "expected a {{data: ...}} envelope, got {}",
                    json_type(&other)
                ))
            }
        };
        if is_empty_stand_in(&data) {
            return ResourceOutcome::Missing;
        }
        match serde_json::from_value(data) {
            Ok(resource) => ResourceOutcome::Found(resource),
            Err(e) => ResourceOutcome::Malformed(e.to_string()),
        }
    }
}

impl<T> ResourceOutcome<T> {
    /// Converts to the facade's error contract.
    ///
    /// `Missing` becomes `EmptyResource`; `Malformed` becomes `MalformedResponse`.
    pub fn into_result(self, resource: &'static str, id: &str, path: &str) -> Result<T, ApiError> {
        match self {
            ResourceOutcome::Found(resource) => Ok(resource),
            ResourceOutcome::Missing => {
                log::error!("Upstream returned an empty payload for {} {}", resource, id);
                Err(ApiError::EmptyResource {
                    resource,
                    id: id.to_string(),
                })
            }
            ResourceOutcome::Malformed(reason) => Err(ApiError::MalformedResponse {
                path: path.to_string(),
                reason,
            }),
        }
    }
}

fn is_empty_stand_in(data: &Value) -> bool {
    match data {
        Value::Object(map) => map.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
