//! Request identifiers

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Identifier the service assigns to a submitted request
///
/// Used as the key for every subsequent status poll. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RequestId(String);

/// Returned when a blank string is used as a request id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("request id cannot be empty")]
pub struct EmptyRequestId;

impl RequestId {
    /// Wraps a service-provided id, rejecting empty or blank strings
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            None
        } else {
            Some(Self(id))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RequestId {
    type Error = EmptyRequestId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(EmptyRequestId)
    }
}

impl std::str::FromStr for RequestId {
    type Err = EmptyRequestId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or(EmptyRequestId)
    }
}

impl From<RequestId> for String {
    fn from(id: RequestId) -> Self {
        id.0
    }
}

impl AsRef<str> for RequestId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_blank_ids() {
        assert!(RequestId::new("").is_none());
        assert!(RequestId::new("   ").is_none());
        assert!("".parse::<RequestId>().is_err());
    }

    #[test]
    fn test_keeps_id_verbatim() {
        let id = RequestId::new("prq_abc123").unwrap();
        assert_eq!(id.as_str(), "prq_abc123");
        assert_eq!(id.to_string(), "prq_abc123");
    }

    #[test]
    fn test_serde_is_transparent() {
        let id: RequestId = serde_json::from_str("\"prq_1\"").unwrap();
        assert_eq!(id.as_str(), "prq_1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"prq_1\"");
        assert!(serde_json::from_str::<RequestId>("\"\"").is_err());
    }
}
