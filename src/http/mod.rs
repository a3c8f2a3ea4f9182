//! HTTP client module
//!
//! Provides the HTTP transport shared by all connectors.
//!
//! # Features
//!
//! - **Authentication**: Integration with the auth module
//! - **Rate Limiting**: Optional token bucket limiter using governor
//! - **Status Mapping**: Non-2xx responses become `Error::HttpStatus`
//! - **Multipart**: File uploads for document-processing APIs

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
