//! Core domain types
//!
//! These types describe a single asynchronous request from submission to its
//! terminal outcome. They are shared between the classifier (which produces
//! outcomes) and the client (which polls until one is terminal).

pub mod outcome;
pub mod poll;
pub mod request;
pub mod response;
pub mod status;
