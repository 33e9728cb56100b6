//! Request commands
//!
//! Submit a request and wait for its result, or fetch the result of a
//! request submitted earlier.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use pangea_client::{
    CancellationToken, ErrorKind, JobFailure, JobOutcome, JobRequest, PollConfig, Poller,
    RequestId,
};
use serde_json::Value;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

#[derive(Subcommand)]
pub enum RequestCommands {
    /// Submit a request and wait for the result
    Submit {
        /// Endpoint path, e.g. v1/scan
        endpoint: String,

        /// JSON payload, or @path to read it from a file
        #[arg(long, short, default_value = "{}")]
        data: String,

        #[command(flatten)]
        poll: PollArgs,

        /// Return right after submission, without polling
        #[arg(long)]
        no_wait: bool,
    },

    /// Fetch the result of a previously accepted request
    Poll {
        /// Request ID returned on submission
        request_id: String,

        /// Keep polling until the request finishes
        #[arg(long)]
        wait: bool,

        #[command(flatten)]
        poll: PollArgs,
    },
}

/// Polling overrides
#[derive(Args, Debug, Default)]
pub struct PollArgs {
    /// Total time to wait for a result, in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Delay between status checks, in milliseconds
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Multiply the delay by this factor after every check
    #[arg(long)]
    backoff: Option<f64>,

    /// Give up after this many status checks
    #[arg(long)]
    max_attempts: Option<u32>,
}

impl PollArgs {
    fn apply(&self, base: &PollConfig) -> PollConfig {
        let mut config = base.clone();
        if let Some(ms) = self.timeout_ms {
            config.timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = self.interval_ms {
            config.interval = Duration::from_millis(ms);
            config.max_interval = config.max_interval.max(config.interval);
        }
        if let Some(multiplier) = self.backoff {
            config.backoff_multiplier = multiplier;
        }
        if self.max_attempts.is_some() {
            config.max_attempts = self.max_attempts;
        }
        config
    }
}

/// Handle request commands
pub async fn handle_request_command(
    command: RequestCommands,
    config: &crate::config::Config,
) -> Result<()> {
    let client = config.client()?;

    match command {
        RequestCommands::Submit {
            endpoint,
            data,
            poll,
            no_wait,
        } => {
            let payload = read_payload(&data)?;
            let request = JobRequest::new(endpoint, payload);

            if no_wait {
                let outcome = client.submit(&request).await;
                return print_outcome(outcome);
            }

            let poll = poll.apply(client.poll_config());
            let cancel = CancellationToken::new();
            let _ctrl_c = CancelOnCtrlC::new(&cancel);

            println!(
                "{} {} {}",
                "Submitting".cyan(),
                request.endpoint.bold(),
                format!("to {}", config.service).dimmed()
            );

            let outcome = client
                .submit_and_await_with(&request, &poll, &cancel)
                .await
                .context("Failed to submit request")?;

            print_outcome(outcome)
        }

        RequestCommands::Poll {
            request_id,
            wait,
            poll,
        } => {
            let request_id = RequestId::new(request_id).context("Request ID cannot be empty")?;

            let outcome = match client.poll_result(&request_id).await {
                JobOutcome::Pending { request_id } if wait => {
                    let poll = poll.apply(client.poll_config());
                    poll.validate()?;

                    let cancel = CancellationToken::new();
                    let _ctrl_c = CancelOnCtrlC::new(&cancel);

                    println!("{} {}", "Waiting for".cyan(), request_id.to_string().bold());

                    Poller::new(client.transport(), &poll, client.status_codes())
                        .wait(request_id, Instant::now(), &cancel)
                        .await
                }
                outcome => outcome,
            };

            print_outcome(outcome)
        }
    }
}

fn read_payload(data: &str) -> Result<Value> {
    let raw = match data.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read payload file: {}", path))?,
        None => data.to_string(),
    };

    let payload: Value = serde_json::from_str(&raw).context("Payload is not valid JSON")?;
    if !payload.is_object() {
        anyhow::bail!("Payload must be a JSON object");
    }
    Ok(payload)
}

/// Cancels a token when the user presses Ctrl-C, until dropped
struct CancelOnCtrlC(JoinHandle<()>);

impl CancelOnCtrlC {
    fn new(cancel: &CancellationToken) -> Self {
        let cancel = cancel.clone();
        Self(tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        }))
    }
}

impl Drop for CancelOnCtrlC {
    fn drop(&mut self) {
        self.0.abort();
    }
}

fn print_outcome(outcome: JobOutcome) -> Result<()> {
    match outcome {
        JobOutcome::Success {
            result,
            status_code,
            request_id,
        } => {
            println!("{} ({})", "Success".green().bold(), status_code);
            if let Some(id) = request_id {
                println!("  {}: {}", "Request ID".bold(), id);
            }
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        JobOutcome::Pending { request_id } => {
            println!("{}", "Accepted".yellow().bold());
            println!("  {}: {}", "Request ID".bold(), request_id);
            println!(
                "  {}",
                format!("Fetch the result with: pangea request poll {}", request_id).dimmed()
            );
            Ok(())
        }
        JobOutcome::Failure(failure) => {
            print_failure(&failure);
            Err(anyhow::Error::new(failure).context("Request did not succeed"))
        }
    }
}

fn print_failure(failure: &JobFailure) {
    let title = match failure.kind {
        ErrorKind::Timeout | ErrorKind::Cancelled => failure.kind.to_string().yellow().bold(),
        _ => failure.kind.to_string().red().bold(),
    };
    println!("{}", title);

    if let Some(code) = failure.status_code {
        println!("  {}: {}", "HTTP status".bold(), code);
    }
    if let Some(status) = &failure.service_status {
        println!("  {}: {}", "Status".bold(), status);
    }
    if let Some(id) = &failure.request_id {
        println!("  {}: {}", "Request ID".bold(), id);
    }
    for error in &failure.errors {
        let location = error.path.as_deref().unwrap_or(&error.source);
        println!(
            "  - {} {}: {}",
            error.code.as_str().red(),
            location.dimmed(),
            error.detail
        );
    }

    if let (ErrorKind::Timeout | ErrorKind::Cancelled, Some(id)) =
        (failure.kind, &failure.request_id)
    {
        println!(
            "  {}",
            format!("Fetch the result later with: pangea request poll {}", id).dimmed()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_inline_payload() {
        let payload = read_payload(r#"{"ip": "1.1.1.1"}"#).unwrap();
        assert_eq!(payload["ip"], "1.1.1.1");
    }

    #[test]
    fn test_payload_must_be_object() {
        assert!(read_payload("[1, 2]").is_err());
        assert!(read_payload("not json").is_err());
    }

    #[test]
    fn test_missing_payload_file() {
        assert!(read_payload("@/nonexistent/payload.json").is_err());
    }

    #[test]
    fn test_poll_args_override() {
        let args = PollArgs {
            timeout_ms: Some(10_000),
            interval_ms: Some(60_000),
            backoff: Some(2.0),
            max_attempts: Some(4),
        };
        let config = args.apply(&PollConfig::default());

        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.interval, Duration::from_secs(60));
        assert_eq!(config.max_interval, Duration::from_secs(60));
        assert_eq!(config.backoff_multiplier, 2.0);
        assert_eq!(config.max_attempts, Some(4));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_poll_args_keep_defaults() {
        let config = PollArgs::default().apply(&PollConfig::default());
        assert_eq!(config, PollConfig::default());
    }

    #[tokio::test]
    async fn test_ctrl_c_listener_stops_on_drop() {
        let cancel = CancellationToken::new();
        let guard = CancelOnCtrlC::new(&cancel);
        let listener = guard.0.abort_handle();

        drop(guard);
        for _ in 0..10 {
            if listener.is_finished() {
                break;
            }
            tokio::task::yield_now().await;
        }

        assert!(listener.is_finished());
        assert!(!cancel.is_cancelled());
    }

    #[test]
    fn test_failure_is_error() {
        let failure = JobFailure::service("Not authorized").with_status_code(401);
        let err = print_outcome(JobOutcome::Failure(failure)).unwrap_err();
        assert!(format!("{:#}", err).contains("Not authorized"));
    }
}
