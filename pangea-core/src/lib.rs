//! Pangea Core
//!
//! Core types for the asynchronous job completion client.
//!
//! This crate contains:
//! - Domain types: request identifiers, job outcomes, polling configuration
//! - DTOs: the JSON envelope every service response is wrapped in
//! - The response classifier, a pure function from a raw response to an outcome
//!
//! Nothing in here performs I/O. Transports and the polling loop live in
//! `pangea-client`.

pub mod classify;
pub mod domain;
pub mod dto;

pub use classify::classify;
pub use domain::outcome::{ErrorKind, JobFailure, JobOutcome};
pub use domain::poll::{InvalidPollConfig, PollConfig};
pub use domain::request::RequestId;
pub use domain::response::RawResponse;
pub use domain::status::{ServiceStatus, StatusCodes};
