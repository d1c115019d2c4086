//! HTTP client module
//!
//! Transport for the collection fetcher: retries with backoff, request
//! timeouts and token-bucket rate limiting.

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RetryPolicy, USER_AGENT};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
