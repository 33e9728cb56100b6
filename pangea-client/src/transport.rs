//! Transport seam
//!
//! A transport performs exactly one request/response exchange per call and
//! never interprets the body. Classification, retries and polling happen
//! above this layer, so tests can swap in an in-memory transport.

use async_trait::async_trait;
use pangea_core::{RawResponse, RequestId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// A request to submit to a service endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRequest {
    /// Endpoint path relative to the service URL (e.g. "v1/ip/reputation")
    pub endpoint: String,
    /// JSON request body
    pub payload: serde_json::Value,
}

impl JobRequest {
    pub fn new(endpoint: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            endpoint: endpoint.into(),
            payload,
        }
    }
}

/// A request that produced no HTTP response
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Connection refused, reset, or interrupted mid-body
    #[error("network error: {0}")]
    Network(String),

    /// No response within the request timeout
    #[error("request timed out: {0}")]
    TimedOut(String),

    /// Anything retrying cannot fix (bad URL, invalid header, ...)
    #[error("request failed: {0}")]
    Fatal(String),
}

impl TransportError {
    /// Whether trying the same request again could succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network(_) | Self::TimedOut(_))
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::TimedOut(e.to_string())
        } else if e.is_connect() || e.is_request() || e.is_body() {
            Self::Network(e.to_string())
        } else {
            Self::Fatal(e.to_string())
        }
    }
}

/// Transport trait for talking to a service
#[async_trait]
pub trait Transport: Send + Sync {
    /// Submits a request
    ///
    /// # Arguments
    /// * `request` - Endpoint and JSON payload
    async fn submit(&self, request: &JobRequest) -> Result<RawResponse, TransportError>;

    /// Fetches the current state of an accepted request
    ///
    /// # Arguments
    /// * `request_id` - The id returned when the request was accepted
    async fn poll_status(&self, request_id: &RequestId) -> Result<RawResponse, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn submit(&self, request: &JobRequest) -> Result<RawResponse, TransportError> {
        (**self).submit(request).await
    }

    async fn poll_status(&self, request_id: &RequestId) -> Result<RawResponse, TransportError> {
        (**self).poll_status(request_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(TransportError::Network("reset".into()).is_transient());
        assert!(TransportError::TimedOut("5s".into()).is_transient());
        assert!(!TransportError::Fatal("bad url".into()).is_transient());
    }
}
