//! In-memory transport for unit tests

use async_trait::async_trait;
use pangea_core::{RawResponse, RequestId};
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::transport::{JobRequest, Transport, TransportError};

type Reply = Result<RawResponse, TransportError>;

/// Replays scripted replies in order and records every call
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    submits: Mutex<VecDeque<Reply>>,
    polls: Mutex<VecDeque<Reply>>,
    /// Returned once `polls` runs dry
    fallback_poll: Option<RawResponse>,
    submitted: Mutex<Vec<JobRequest>>,
    polled: Mutex<Vec<RequestId>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn on_submit(self, reply: Reply) -> Self {
        self.submits.lock().unwrap().push_back(reply);
        self
    }

    pub(crate) fn then_poll(self, reply: Reply) -> Self {
        self.polls.lock().unwrap().push_back(reply);
        self
    }

    pub(crate) fn then_poll_n(self, n: usize, reply: Reply) -> Self {
        {
            let mut polls = self.polls.lock().unwrap();
            for _ in 0..n {
                polls.push_back(reply.clone());
            }
        }
        self
    }

    pub(crate) fn otherwise(mut self, response: RawResponse) -> Self {
        self.fallback_poll = Some(response);
        self
    }

    pub(crate) fn submit_count(&self) -> usize {
        self.submitted.lock().unwrap().len()
    }

    pub(crate) fn poll_count(&self) -> usize {
        self.polled.lock().unwrap().len()
    }

    pub(crate) fn polled_ids(&self) -> Vec<RequestId> {
        self.polled.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn submit(&self, request: &JobRequest) -> Reply {
        self.submitted.lock().unwrap().push(request.clone());
        self.submits
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Fatal("no scripted submit reply".into())))
    }

    async fn poll_status(&self, request_id: &RequestId) -> Reply {
        self.polled.lock().unwrap().push(request_id.clone());
        let next = self.polls.lock().unwrap().pop_front();
        match next {
            Some(reply) => reply,
            None => self
                .fallback_poll
                .clone()
                .ok_or_else(|| TransportError::Fatal("no scripted poll reply".into())),
        }
    }
}

pub(crate) fn accepted(request_id: &str) -> Reply {
    Ok(RawResponse::json(
        202,
        &json!({
            "request_id": request_id,
            "status": "Accepted",
            "summary": "Your request is in progress",
            "result": {}
        }),
    ))
}

pub(crate) fn succeeded(request_id: &str, result: serde_json::Value) -> Reply {
    Ok(RawResponse::json(
        200,
        &json!({
            "request_id": request_id,
            "status": "Success",
            "summary": "Success",
            "result": result
        }),
    ))
}

pub(crate) fn rejected(request_id: &str, status: &str, summary: &str) -> Reply {
    Ok(RawResponse::json(
        400,
        &json!({
            "request_id": request_id,
            "status": status,
            "summary": summary,
            "result": null
        }),
    ))
}

pub(crate) fn not_found(request_id: &str) -> Reply {
    Ok(RawResponse::json(
        404,
        &json!({
            "request_id": request_id,
            "status": "NotFound",
            "summary": "Resource not found",
            "result": null
        }),
    ))
}

pub(crate) fn network_error() -> Reply {
    Err(TransportError::Network("connection reset by peer".into()))
}

pub(crate) fn request(payload: serde_json::Value) -> JobRequest {
    JobRequest::new("v1/file/scan", payload)
}
