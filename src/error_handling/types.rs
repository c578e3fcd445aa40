//! Error type definitions.
//!
//! This module defines every error the client can surface: initialization
//! failures, transport failures, and the classified API errors that cross the
//! facade boundary.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::{AsRefStr, EnumIter as EnumIterMacro};
use thiserror::Error;

use crate::pagination::ExhaustionReason;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),

    /// The base URL could not be parsed.
    #[error("Invalid base URL '{url}': {source}")]
    BaseUrlError {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// No API key was configured.
    #[error("Missing API key (set {0})")]
    MissingApiKeyError(&'static str),
}

/// Connection-level failure reported by a [`Transport`](crate::fetch::Transport).
#[derive(Error, Debug)]
pub enum TransportError {
    /// Failure raised by the reqwest client.
    #[error("HTTP transport error: {0}")]
    Http(#[from] ReqwestError),

    /// Failure raised by a non-reqwest transport (e.g. a connection reset).
    #[error("Connection error: {0}")]
    Connection(String),

    /// The request could not be turned into a URL.
    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),
}

impl TransportError {
    /// Whether another attempt could plausibly succeed.
    ///
    /// Timeouts, connect failures and mid-request failures are transient.
    /// Builder, redirect and decode failures are properties of the request
    /// itself and will fail the same way again.
    pub fn is_retriable(&self) -> bool {
        match self {
            TransportError::Http(err) => {
                if err.is_builder() || err.is_redirect() || err.is_decode() {
                    return false;
                }
                err.is_timeout() || err.is_connect() || err.is_request() || err.is_body()
            }
            TransportError::Connection(_) => true,
            TransportError::InvalidUrl(_) => false,
        }
    }
}

/// Classified failure of one logical API call.
///
/// Retries are fully contained in the executor: anything of this type is
/// final.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Every attempt was answered with 429.
    #[error("Rate limit exceeded after {attempts} attempts")]
    RateLimitExceeded { attempts: u32 },

    /// Every attempt was answered with 5xx.
    #[error("Upstream server error {status} after {attempts} attempts: {body}")]
    TransientServerError {
        status: u16,
        body: String,
        attempts: u32,
    },

    /// Non-retriable 4xx (anything except 429).
    #[error("Upstream rejected request with {status}: {body}")]
    ClientRequestError { status: u16, body: String },

    /// Connection-level failure that outlived its retries.
    #[error("Network error after {attempts} attempts: {source}")]
    NetworkError {
        attempts: u32,
        #[source]
        source: TransportError,
    },

    /// A single-resource fetch came back as an empty stand-in instead of a resource.
    #[error("{resource} '{id}' not found: upstream returned an empty payload")]
    EmptyResource { resource: &'static str, id: String },

    /// A 2xx body that could not be interpreted.
    #[error("Malformed upstream response for {path}: {reason}")]
    MalformedResponse { path: String, reason: String },

    /// A stage name did not match any configured stage.
    #[error("Stage \"{0}\" not found")]
    StageNotFound(String),

    /// A reference list needed for a lookup stopped before its last page.
    #[error("{resource} list is incomplete (stopped: {exhausted}); refusing to resolve names against it")]
    IncompleteReferenceList {
        resource: &'static str,
        exhausted: ExhaustionReason,
    },

    /// An id that cannot stand as a single URL path segment.
    #[error("Invalid id '{0}': not usable as a URL path segment")]
    InvalidIdentifier(String),

    /// The request queue consumer is gone (client dropped mid-call).
    #[error("Client request queue is closed")]
    ClientShutdown,
}

/// Coarse category of an [`ApiError`], for statistics and error payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    RateLimitExceeded,
    TransientServerError,
    ClientRequestError,
    NetworkError,
    EmptyResource,
    MalformedResponse,
    StageNotFound,
    IncompleteReferenceList,
    InvalidIdentifier,
    ClientShutdown,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl ApiError {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::RateLimitExceeded { .. } => ErrorKind::RateLimitExceeded,
            ApiError::TransientServerError { .. } => ErrorKind::TransientServerError,
            ApiError::ClientRequestError { .. } => ErrorKind::ClientRequestError,
            ApiError::NetworkError { .. } => ErrorKind::NetworkError,
            ApiError::EmptyResource { .. } => ErrorKind::EmptyResource,
            ApiError::MalformedResponse { .. } => ErrorKind::MalformedResponse,
            ApiError::StageNotFound(_) => ErrorKind::StageNotFound,
            ApiError::IncompleteReferenceList { .. } => ErrorKind::IncompleteReferenceList,
            ApiError::InvalidIdentifier(_) => ErrorKind::InvalidIdentifier,
            ApiError::ClientShutdown => ErrorKind::ClientShutdown,
        }
    }

    /// True for an upstream 404 and for an empty-payload miss.
    pub fn is_not_found(&self) -> bool {
        match self {
            ApiError::ClientRequestError { status, .. } => {
                *status == crate::config::HTTP_STATUS_NOT_FOUND
            }
            ApiError::EmptyResource { .. } => true,
            _ => false,
        }
    }

    /// Structured error payload for callers that report errors as JSON.
    pub fn to_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "error": self.kind().as_ref(),
            "message": self.to_string(),
            "status": self.status(),
        })
    }

    /// Upstream HTTP status attached to this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::RateLimitExceeded { .. } => {
                Some(crate::config::HTTP_STATUS_TOO_MANY_REQUESTS)
            }
            ApiError::TransientServerError { status, .. }
            | ApiError::ClientRequestError { status, .. } => Some(*status),
            _ => None,
        }
    }
}
