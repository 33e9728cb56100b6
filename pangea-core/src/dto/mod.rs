//! Data Transfer Objects for the service wire format
//!
//! Every service wraps its payload in the same JSON envelope; the classifier
//! only ever looks at the envelope, never at service-specific result shapes.

pub mod envelope;

pub use envelope::{ErrorResult, ResponseEnvelope};
