//! Raw transport responses

use std::borrow::Cow;

/// One request/response exchange as seen by the classifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status_code: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status_code: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status_code,
            body: body.into(),
        }
    }

    /// Builds a response whose body is the serialized JSON value
    pub fn json(status_code: u16, body: &serde_json::Value) -> Self {
        Self {
            status_code,
            body: body.to_string().into_bytes(),
        }
    }

    /// Body as text, with invalid UTF-8 replaced
    pub fn text_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}
