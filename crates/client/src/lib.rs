//! Typed, authenticated HTTP client for the motordesk backend
//!
//! Every request carries the current bearer token; a 401 triggers a
//! single-flight refresh of the token pair, with concurrent callers queued
//! and replayed once the refresh settles.

pub mod client;
pub mod error;
pub mod types;

pub use client::{ApiClient, ApiClientBuilder};
pub use error::ApiError;
