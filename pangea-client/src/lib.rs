//! Pangea Job Client
//!
//! Submits requests to Pangea services and waits for the ones the service
//! answers with "accepted, still processing".
//!
//! The client is layered top to bottom:
//! - [`JobClient`] submits a request and, if it was accepted, hands it to the poller
//! - [`Poller`] checks the request's status until it is terminal, the deadline
//!   passes or the caller cancels
//! - [`Transport`] performs single HTTP exchanges ([`HttpTransport`] in production)
//!
//! Every call resolves to exactly one [`JobOutcome`]. Business failures are
//! returned as data; only invalid configuration is an `Err`.
//!
//! # Example
//!
//! ```no_run
//! use pangea_client::{JobClient, JobOutcome, JobRequest, ServiceConfig};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServiceConfig::from_env()?;
//!     let client = JobClient::http("file-scan", config)?;
//!
//!     let request = JobRequest::new("v1/scan", json!({"url": "https://example.com/file.pdf"}));
//!     match client.submit_and_await(&request).await? {
//!         JobOutcome::Success { result, .. } => println!("{}", result),
//!         JobOutcome::Failure(failure) => eprintln!("{}", failure),
//!         JobOutcome::Pending { request_id } => println!("still running: {}", request_id),
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod http;
mod jobs;
pub mod poller;
pub mod transport;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use config::{Environment, ServiceConfig};
pub use error::{ClientError, Result};
pub use http::HttpTransport;
pub use pangea_core::{ErrorKind, JobFailure, JobOutcome, PollConfig, RequestId, StatusCodes};
pub use poller::Poller;
pub use tokio_util::sync::CancellationToken;
pub use transport::{JobRequest, Transport, TransportError};

/// Client for submitting requests and awaiting their results
///
/// Holds no per-request state: concurrent calls on one client run
/// independently, each with its own timers.
#[derive(Debug, Clone)]
pub struct JobClient<T> {
    transport: T,
    poll: PollConfig,
    codes: StatusCodes,
    queued_retry_enabled: bool,
}

impl<T: Transport> JobClient<T> {
    /// Create a new job client with default polling settings
    ///
    /// # Arguments
    /// * `transport` - The transport used for submissions and status checks
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            poll: PollConfig::default(),
            codes: StatusCodes::default(),
            queued_retry_enabled: true,
        }
    }

    /// Set the poll configuration used by [`submit_and_await`](Self::submit_and_await)
    pub fn with_poll_config(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    /// Set the HTTP codes of the remote contract
    pub fn with_status_codes(mut self, codes: StatusCodes) -> Self {
        self.codes = codes;
        self
    }

    /// Enable or disable automatic polling of accepted requests
    pub fn with_queued_retry(mut self, enabled: bool) -> Self {
        self.queued_retry_enabled = enabled;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn poll_config(&self) -> &PollConfig {
        &self.poll
    }

    pub fn status_codes(&self) -> StatusCodes {
        self.codes
    }
}

impl JobClient<HttpTransport> {
    /// Create a job client talking HTTP to one service
    ///
    /// # Arguments
    /// * `service` - Service name (e.g. "audit", "file-scan")
    /// * `config` - Service configuration
    pub fn http(service: impl Into<String>, config: ServiceConfig) -> Result<Self> {
        let poll = config.poll.clone();
        let codes = config.status_codes;
        let queued_retry_enabled = config.queued_retry_enabled;
        let transport = HttpTransport::new(service, config)?;

        Ok(Self {
            transport,
            poll,
            codes,
            queued_retry_enabled,
        })
    }
}
