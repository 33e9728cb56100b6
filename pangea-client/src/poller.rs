//! Result poller
//!
//! Turns a `Pending` outcome into a terminal one by checking the request's
//! status until it finishes, the deadline passes, the attempt cap is hit, or
//! the caller cancels. Status checks for one request are strictly sequential.

use pangea_core::{JobFailure, JobOutcome, PollConfig, RequestId, StatusCodes, classify};
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::transport::Transport;

const NOT_FOUND: u16 = 404;

/// Polls a single accepted request to completion
pub struct Poller<'a, T: ?Sized> {
    transport: &'a T,
    config: &'a PollConfig,
    codes: StatusCodes,
}

impl<'a, T: Transport + ?Sized> Poller<'a, T> {
    pub fn new(transport: &'a T, config: &'a PollConfig, codes: StatusCodes) -> Self {
        Self {
            transport,
            config,
            codes,
        }
    }

    /// Polls until the request reaches a terminal outcome
    ///
    /// # Arguments
    /// * `request_id` - The id of the accepted request
    /// * `submitted_at` - When the request was submitted; the timeout counts from here
    /// * `cancel` - Aborts the wait at the next sleep or before the next request
    pub async fn wait(
        &self,
        request_id: RequestId,
        submitted_at: Instant,
        cancel: &CancellationToken,
    ) -> JobOutcome {
        // No deadline when the timeout reaches past the end of the clock
        let deadline = submitted_at.checked_add(self.config.timeout);
        let mut attempts: u32 = 0;
        let mut transport_failures: u32 = 0;
        let mut not_found: u32 = 0;

        loop {
            let now = Instant::now();
            if deadline.is_some_and(|deadline| now >= deadline) {
                return self.timed_out(request_id, attempts);
            }

            if self.config.max_attempts.is_some_and(|max| attempts >= max) {
                info!(
                    "Giving up on request {} after {} attempt(s)",
                    request_id, attempts
                );
                return JobFailure::timeout(format!(
                    "request still pending after {} status check(s)",
                    attempts
                ))
                .with_request_id(Some(request_id))
                .into();
            }

            let mut delay = self.config.delay_for_attempt(attempts + 1);
            if let Some(deadline) = deadline {
                delay = delay.min(deadline.saturating_duration_since(now));
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Self::cancelled(request_id),
                _ = time::sleep(delay) => {}
            }

            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                return self.timed_out(request_id, attempts);
            }
            if cancel.is_cancelled() {
                return Self::cancelled(request_id);
            }

            attempts += 1;
            debug!("Polling request {} (attempt {})", request_id, attempts);

            match self.transport.poll_status(&request_id).await {
                // A result that is not registered yet reads as 404
                Ok(response)
                    if response.status_code == NOT_FOUND
                        && not_found < self.config.max_transport_retries =>
                {
                    transport_failures = 0;
                    not_found += 1;
                    debug!(
                        "Request {} not found yet ({}/{})",
                        request_id, not_found, self.config.max_transport_retries
                    );
                }
                Ok(response) => {
                    transport_failures = 0;
                    not_found = 0;
                    match classify(&response, &self.codes) {
                        JobOutcome::Pending { .. } => {
                            debug!("Request {} still pending", request_id);
                        }
                        outcome => {
                            info!(
                                "Request {} finished after {} attempt(s)",
                                request_id, attempts
                            );
                            return with_request_id(outcome, request_id);
                        }
                    }
                }
                Err(e)
                    if e.is_transient() && transport_failures < self.config.max_transport_retries =>
                {
                    transport_failures += 1;
                    warn!(
                        "Failed to poll request {} ({}/{}): {}",
                        request_id, transport_failures, self.config.max_transport_retries, e
                    );
                }
                Err(e) => {
                    warn!("Giving up on request {}: {}", request_id, e);
                    return JobFailure::transport(e.to_string())
                        .with_request_id(Some(request_id))
                        .into();
                }
            }
        }
    }

    fn timed_out(&self, request_id: RequestId, attempts: u32) -> JobOutcome {
        info!(
            "Request {} still pending after {:?} ({} attempt(s))",
            request_id, self.config.timeout, attempts
        );
        JobFailure::timeout(format!(
            "request still pending after {:?}",
            self.config.timeout
        ))
        .with_request_id(Some(request_id))
        .into()
    }

    fn cancelled(request_id: RequestId) -> JobOutcome {
        info!("Stopped polling request {}: cancelled", request_id);
        JobFailure::cancelled().with_request_id(Some(request_id)).into()
    }
}

/// Fills in the polled request id when the response did not carry one
pub(crate) fn with_request_id(outcome: JobOutcome, id: RequestId) -> JobOutcome {
    match outcome {
        JobOutcome::Success {
            result,
            status_code,
            request_id,
        } => JobOutcome::Success {
            result,
            status_code,
            request_id: request_id.or(Some(id)),
        },
        JobOutcome::Failure(mut failure) => {
            if failure.request_id.is_none() {
                failure.request_id = Some(id);
            }
            JobOutcome::Failure(failure)
        }
        pending @ JobOutcome::Pending { .. } => pending,
    }
}
