//! Response classifier
//!
//! Turns a raw transport response into exactly one [`JobOutcome`]:
//! - the success code with a `Success` envelope is a `Success`
//! - the accepted code with a request id is `Pending`
//! - everything else is a `Failure`, either `Service` (the service told us
//!   why) or `Protocol` (the response did not look like the contract)

use crate::domain::outcome::{JobFailure, JobOutcome};
use crate::domain::response::RawResponse;
use crate::domain::status::{ServiceStatus, StatusCodes};
use crate::dto::envelope::ResponseEnvelope;

const SERVICE_UNAVAILABLE: u16 = 503;
const BODY_EXCERPT_CHARS: usize = 200;

/// Classifies a response against the given status codes
pub fn classify(response: &RawResponse, codes: &StatusCodes) -> JobOutcome {
    let code = response.status_code;
    let envelope = ResponseEnvelope::parse(&response.body);

    if code == codes.accepted {
        return match envelope {
            Ok(envelope) => match envelope.request_id() {
                Some(request_id) => JobOutcome::Pending { request_id },
                None => JobFailure::protocol("accepted response carries no request_id")
                    .with_status_code(code)
                    .into(),
            },
            Err(e) => malformed(response, &e).into(),
        };
    }

    if code == codes.success {
        return match envelope {
            Ok(envelope) if envelope.service_status() == ServiceStatus::Success => {
                JobOutcome::Success {
                    request_id: envelope.request_id(),
                    result: envelope.result,
                    status_code: code,
                }
            }
            Ok(envelope) => service_failure(code, envelope).into(),
            Err(e) => malformed(response, &e).into(),
        };
    }

    match envelope {
        Ok(envelope) => service_failure(code, envelope).into(),
        Err(_) if code == SERVICE_UNAVAILABLE => {
            JobFailure::service("service temporarily unavailable")
                .with_status_code(code)
                .into()
        }
        Err(e) => malformed(response, &e).into(),
    }
}

fn service_failure(code: u16, envelope: ResponseEnvelope) -> JobFailure {
    let status = envelope.service_status();
    let errors = envelope.errors();
    let message = if envelope.summary.is_empty() {
        status.to_string()
    } else {
        envelope.summary.clone()
    };

    JobFailure::service(message)
        .with_status_code(code)
        .with_request_id(envelope.request_id())
        .with_service_status(status)
        .with_errors(errors)
}

fn malformed(response: &RawResponse, err: &serde_json::Error) -> JobFailure {
    let text = response.text_lossy();
    let mut excerpt: String = text.chars().take(BODY_EXCERPT_CHARS).collect();
    if text.chars().count() > BODY_EXCERPT_CHARS {
        excerpt.push_str("...");
    }

    JobFailure::protocol(format!(
        "unexpected response body (status {}): {}: {}",
        response.status_code, err, excerpt
    ))
    .with_status_code(response.status_code)
}
