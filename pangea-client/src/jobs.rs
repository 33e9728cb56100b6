//! Submission and result retrieval

use pangea_core::{JobFailure, JobOutcome, PollConfig, RequestId, classify};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::JobClient;
use crate::error::Result;
use crate::poller::{Poller, with_request_id};
use crate::transport::{JobRequest, Transport};

impl<T: Transport> JobClient<T> {
    // =============================================================================
    // Submit and Await
    // =============================================================================

    /// Submit a request and wait for its result using the client's poll config
    ///
    /// # Arguments
    /// * `request` - Endpoint and payload to submit
    ///
    /// # Returns
    /// The terminal outcome, or `Err` if the poll configuration is invalid
    pub async fn submit_and_await(&self, request: &JobRequest) -> Result<JobOutcome> {
        self.submit_and_await_with(request, &self.poll, &CancellationToken::new())
            .await
    }

    /// Submit a request and wait for its result
    ///
    /// If the service accepts the request for background processing, its
    /// status is polled until it finishes or `config.timeout` (counted from
    /// submission) runs out. With a zero timeout, or with queued retries
    /// disabled, an accepted request yields a `Timeout` failure carrying the
    /// request id so the caller can check back later with
    /// [`poll_result`](Self::poll_result).
    ///
    /// # Arguments
    /// * `request` - Endpoint and payload to submit
    /// * `config` - How to poll if the request is accepted
    /// * `cancel` - Stops waiting at the next suspension point
    ///
    /// # Returns
    /// The terminal outcome, or `Err` if `config` is invalid
    pub async fn submit_and_await_with(
        &self,
        request: &JobRequest,
        config: &PollConfig,
        cancel: &CancellationToken,
    ) -> Result<JobOutcome> {
        config.validate()?;

        if cancel.is_cancelled() {
            info!("Not submitting to {}: cancelled", request.endpoint);
            return Ok(JobFailure::cancelled().into());
        }

        let submitted_at = Instant::now();
        let request_id = match self.submit(request).await {
            JobOutcome::Pending { request_id } => request_id,
            terminal => return Ok(terminal),
        };

        if !self.queued_retry_enabled || !config.is_enabled() {
            info!(
                "Request {} accepted; polling disabled, leaving it to the caller",
                request_id
            );
            return Ok(JobFailure::timeout(
                "request accepted but polling is disabled; poll the request id later",
            )
            .with_request_id(Some(request_id))
            .into());
        }

        info!(
            "Request {} accepted, polling for up to {:?}",
            request_id, config.timeout
        );

        let outcome = Poller::new(&self.transport, config, self.codes)
            .wait(request_id, submitted_at, cancel)
            .await;

        Ok(outcome)
    }

    // =============================================================================
    // Single Exchanges
    // =============================================================================

    /// Submit a request without waiting
    ///
    /// Returns `Pending` when the service accepted the request for background
    /// processing.
    pub async fn submit(&self, request: &JobRequest) -> JobOutcome {
        debug!("Submitting request to {}", request.endpoint);

        match self.transport.submit(request).await {
            Ok(response) => classify(&response, &self.codes),
            Err(e) => {
                warn!("Failed to submit request to {}: {}", request.endpoint, e);
                JobFailure::transport(e.to_string()).into()
            }
        }
    }

    /// Check the status of an accepted request once
    ///
    /// # Arguments
    /// * `request_id` - The id returned when the request was accepted
    ///
    /// # Returns
    /// `Pending` while the service is still working, otherwise the terminal outcome
    pub async fn poll_result(&self, request_id: &RequestId) -> JobOutcome {
        debug!("Checking status of request {}", request_id);

        match self.transport.poll_status(request_id).await {
            Ok(response) => with_request_id(classify(&response, &self.codes), request_id.clone()),
            Err(e) => {
                warn!("Failed to check request {}: {}", request_id, e);
                JobFailure::transport(e.to_string())
                    .with_request_id(Some(request_id.clone()))
                    .into()
            }
        }
    }
}
