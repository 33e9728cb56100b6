//! Job outcome types
//!
//! A submitted request always ends in exactly one [`JobOutcome`]. Failures are
//! data, not errors: callers branch with an exhaustive `match` instead of
//! inspecting error types.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::domain::request::RequestId;
use crate::domain::status::ServiceStatus;

/// Result of classifying a response, or of waiting on an accepted request
#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    /// The service finished the request
    Success {
        /// The envelope's `result` field, exactly as received
        result: serde_json::Value,
        status_code: u16,
        request_id: Option<RequestId>,
    },
    /// The request failed definitively, or waiting for it was abandoned
    Failure(JobFailure),
    /// The service accepted the request and is still processing it
    Pending { request_id: RequestId },
}

impl JobOutcome {
    /// Success and Failure are terminal; Pending is not
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending { .. })
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        match self {
            Self::Success { request_id, .. } => request_id.as_ref(),
            Self::Failure(failure) => failure.request_id.as_ref(),
            Self::Pending { request_id } => Some(request_id),
        }
    }

    /// The failure kind, if this outcome is a failure
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Failure(failure) => Some(failure.kind),
            _ => None,
        }
    }
}

impl From<JobFailure> for JobOutcome {
    fn from(failure: JobFailure) -> Self {
        Self::Failure(failure)
    }
}

/// Failure taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// The response did not match the expected contract
    Protocol,
    /// The service reported a business failure
    Service,
    /// The request never produced an HTTP response
    Transport,
    /// The deadline or the attempt cap was reached while still pending
    Timeout,
    /// The caller aborted the wait
    Cancelled,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Protocol => "protocol error",
            Self::Service => "service error",
            Self::Transport => "transport error",
            Self::Timeout => "timed out",
            Self::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// Detail entry a service attaches to a failed request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorField {
    pub code: String,
    pub detail: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// A terminal failure
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}: {message}")]
pub struct JobFailure {
    pub kind: ErrorKind,
    /// HTTP status code, absent when no response was received
    pub status_code: Option<u16>,
    /// Human readable message; service summaries are kept verbatim
    pub message: String,
    pub request_id: Option<RequestId>,
    pub service_status: Option<ServiceStatus>,
    pub errors: Vec<ErrorField>,
}

impl JobFailure {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            status_code: None,
            message: message.into(),
            request_id: None,
            service_status: None,
            errors: Vec::new(),
        }
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Protocol, message)
    }

    pub fn service(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Service, message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transport, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Timeout, message)
    }

    pub fn cancelled() -> Self {
        Self::new(ErrorKind::Cancelled, "cancelled by caller")
    }

    pub fn with_status_code(mut self, status_code: u16) -> Self {
        self.status_code = Some(status_code);
        self
    }

    pub fn with_request_id(mut self, request_id: Option<RequestId>) -> Self {
        self.request_id = request_id;
        self
    }

    pub fn with_service_status(mut self, status: ServiceStatus) -> Self {
        self.service_status = Some(status);
        self
    }

    pub fn with_errors(mut self, errors: Vec<ErrorField>) -> Self {
        self.errors = errors;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        let pending = JobOutcome::Pending {
            request_id: RequestId::new("prq_1").unwrap(),
        };
        assert!(!pending.is_terminal());
        assert_eq!(pending.request_id().map(|id| id.as_str()), Some("prq_1"));

        let failure: JobOutcome = JobFailure::cancelled().into();
        assert!(failure.is_terminal());
        assert_eq!(failure.error_kind(), Some(ErrorKind::Cancelled));
        assert!(failure.request_id().is_none());
    }

    #[test]
    fn test_failure_display() {
        let failure = JobFailure::service("Invalid token")
            .with_status_code(401)
            .with_service_status(ServiceStatus::Unauthorized);
        assert_eq!(failure.to_string(), "service error: Invalid token");
        assert_eq!(failure.status_code, Some(401));
    }
}
