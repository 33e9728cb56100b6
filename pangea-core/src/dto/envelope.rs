//! Response envelope DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::outcome::ErrorField;
use crate::domain::request::RequestId;
use crate::domain::status::ServiceStatus;

/// JSON envelope wrapping every service response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub request_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub response_time: Option<DateTime<Utc>>,
    pub status: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub result: serde_json::Value,
}

/// The `result` of a failed request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorResult {
    #[serde(default)]
    pub errors: Vec<ErrorField>,
}

impl ResponseEnvelope {
    /// Parses an envelope from a raw response body
    pub fn parse(body: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(body)
    }

    pub fn service_status(&self) -> ServiceStatus {
        ServiceStatus::from(self.status.as_str())
    }

    /// The request id, if the service sent a non-empty one
    pub fn request_id(&self) -> Option<RequestId> {
        self.request_id.clone().and_then(RequestId::new)
    }

    /// Error details from `result.errors`, empty when absent or malformed
    pub fn errors(&self) -> Vec<ErrorField> {
        if self.result.is_null() {
            return Vec::new();
        }

        ErrorResult::deserialize(&self.result)
            .map(|r| r.errors)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_full_envelope() {
        let body = json!({
            "request_id": "prq_123",
            "request_time": "2025-07-31T14:27:58.899758Z",
            "response_time": "2025-07-31T14:27:59.659923Z",
            "status": "Success",
            "summary": "ok",
            "result": {"found": true}
        });

        let envelope = ResponseEnvelope::parse(body.to_string().as_bytes()).unwrap();
        assert_eq!(envelope.request_id().unwrap().as_str(), "prq_123");
        assert_eq!(envelope.service_status(), ServiceStatus::Success);
        assert!(envelope.request_time.is_some());
        assert_eq!(envelope.result, json!({"found": true}));
    }

    #[test]
    fn test_missing_status_is_rejected() {
        let body = json!({"request_id": "prq_123", "result": {}});
        assert!(ResponseEnvelope::parse(body.to_string().as_bytes()).is_err());
    }

    #[test]
    fn test_error_details() {
        let body = json!({
            "request_id": "prq_123",
            "status": "ValidationError",
            "summary": "bad request",
            "result": {"errors": [
                {"code": "missing", "detail": "ip is required", "source": "/ip"}
            ]}
        });

        let envelope = ResponseEnvelope::parse(body.to_string().as_bytes()).unwrap();
        let errors = envelope.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].detail, "ip is required");
        assert!(errors[0].path.is_none());
    }

    #[test]
    fn test_blank_request_id_is_ignored() {
        let body = json!({"request_id": "", "status": "Accepted"});
        let envelope = ResponseEnvelope::parse(body.to_string().as_bytes()).unwrap();
        assert!(envelope.request_id().is_none());
    }
}
