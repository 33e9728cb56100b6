//! Service status values and the HTTP codes that drive classification

use serde::{Deserialize, Serialize};
use std::fmt;

/// The `status` field a service reports in its response envelope
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ServiceStatus {
    Success,
    Accepted,
    ValidationError,
    TooManyRequests,
    NoCredit,
    Unauthorized,
    ServiceNotEnabled,
    ProviderError,
    MissingConfigId,
    MissingConfigIdScope,
    ServiceNotAvailable,
    InvalidPayloadReceived,
    ForbiddenVaultOperation,
    NotFound,
    InternalError,
    Other(String),
}

impl ServiceStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Success => "Success",
            Self::Accepted => "Accepted",
            Self::ValidationError => "ValidationError",
            Self::TooManyRequests => "TooManyRequests",
            Self::NoCredit => "NoCredit",
            Self::Unauthorized => "Unauthorized",
            Self::ServiceNotEnabled => "ServiceNotEnabled",
            Self::ProviderError => "ProviderError",
            Self::MissingConfigId => "MissingConfigID",
            Self::MissingConfigIdScope => "MissingConfigIDScope",
            Self::ServiceNotAvailable => "ServiceNotAvailable",
            Self::InvalidPayloadReceived => "InvalidPayloadReceived",
            Self::ForbiddenVaultOperation => "ForbiddenVaultOperation",
            Self::NotFound => "NotFound",
            Self::InternalError => "InternalError",
            Self::Other(s) => s,
        }
    }
}

impl From<&str> for ServiceStatus {
    fn from(s: &str) -> Self {
        match s {
            "Success" => Self::Success,
            "Accepted" => Self::Accepted,
            "ValidationError" => Self::ValidationError,
            "TooManyRequests" => Self::TooManyRequests,
            "NoCredit" => Self::NoCredit,
            "Unauthorized" => Self::Unauthorized,
            "ServiceNotEnabled" => Self::ServiceNotEnabled,
            "ProviderError" => Self::ProviderError,
            "MissingConfigID" => Self::MissingConfigId,
            "MissingConfigIDScope" => Self::MissingConfigIdScope,
            "ServiceNotAvailable" => Self::ServiceNotAvailable,
            "InvalidPayloadReceived" => Self::InvalidPayloadReceived,
            "ForbiddenVaultOperation" => Self::ForbiddenVaultOperation,
            "NotFound" => Self::NotFound,
            "InternalError" => Self::InternalError,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// HTTP status codes of the remote contract
///
/// One code means "final success", one means "queued, poll later". Every
/// other code is a final failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCodes {
    pub success: u16,
    pub accepted: u16,
}

impl Default for StatusCodes {
    fn default() -> Self {
        Self {
            success: 200,
            accepted: 202,
        }
    }
}
