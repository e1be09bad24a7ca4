//! Transport layer for posting to webhook endpoints.
//!
//! This module provides types and traits for:
//! - Building HTTP requests ([`HttpRequest`])
//! - Handling HTTP responses ([`HttpResponse`])
//! - Abstracting HTTP clients ([`HttpClient`])
//! - Production HTTP client implementation ([`ReqwestClient`])
//! - Retrying transient failures ([`RetryingClient`], [`RetryPolicy`])

mod client;
mod error;
mod http;
mod retry;
mod retrying;

#[cfg(test)]
mod retrying_tests;

pub use client::ReqwestClient;
pub use error::HttpError;
pub use http::{HttpClient, HttpRequest, HttpResponse};
pub use retry::RetryPolicy;
pub use retrying::{IsRetryable, RetryingClient};
