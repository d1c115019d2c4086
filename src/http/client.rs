//! Admin API transport
//!
//! A page load is one GET of a path plus query string such as
//! `/customers?offset=50&limit=50`, joined onto the configured base URL.
//! Throttling (429), gateway errors, timeouts and refused connections are
//! retried under a [`RetryPolicy`]. Anything else fails on the first answer.

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use crate::error::{Error, Result};
use crate::types::BackoffType;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, RETRY_AFTER};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// User agent sent with every request
pub const USER_AGENT: &str = concat!("customer-console/", env!("CARGO_PKG_VERSION"));

/// Wait used when a 429 carries no usable `Retry-After`
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

// ============================================================================
// Retry Policy
// ============================================================================

/// How often, and after what delay, a failed GET is tried again
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Growth of the delay between retries
    pub backoff: BackoffType,
    /// Delay before the first retry
    pub initial: Duration,
    /// Upper bound on any delay
    pub ceiling: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff: BackoffType::Exponential,
            initial: Duration::from_millis(100),
            ceiling: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// Delay before retrying after failed attempt number `attempt` (0-based)
    pub fn delay(&self, attempt: u32) -> Duration {
        let delay = match self.backoff {
            BackoffType::Constant => self.initial,
            BackoffType::Linear => self.initial.saturating_mul(attempt.saturating_add(1)),
            BackoffType::Exponential => self.initial.saturating_mul(2u32.saturating_pow(attempt)),
        };
        delay.min(self.ceiling)
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Transport settings
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Prefix of every request path
    pub base_url: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
    /// Retry behaviour
    pub retry: RetryPolicy,
    /// Token bucket, off when `None`
    pub rate_limit: Option<RateLimiterConfig>,
    /// Headers sent with every request
    pub headers: HashMap<String, String>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
            rate_limit: None,
            headers: HashMap::new(),
        }
    }
}

impl HttpClientConfig {
    /// Start a builder from the defaults
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for [`HttpClientConfig`]
#[derive(Debug, Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Set the per-request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the number of retries
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.retry.max_retries = retries;
        self
    }

    /// Set the backoff curve and its bounds
    pub fn backoff(mut self, backoff: BackoffType, initial: Duration, ceiling: Duration) -> Self {
        self.config.retry.backoff = backoff;
        self.config.retry.initial = initial;
        self.config.retry.ceiling = ceiling;
        self
    }

    /// Pace requests with a token bucket
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Send requests unpaced
    pub fn no_rate_limit(mut self) -> Self {
        self.config.rate_limit = None;
        self
    }

    /// Add a header sent with every request
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.headers.insert(key.into(), value.into());
        self
    }

    /// Finish
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

// ============================================================================
// Client
// ============================================================================

/// How one attempt ended
enum Attempt {
    Done(Response),
    Retry { error: Error, wait: Duration },
    Fail(Error),
}

/// GET-only client for the admin API
#[derive(Debug)]
pub struct HttpClient {
    client: Client,
    base_url: Option<String>,
    timeout: Duration,
    retry: RetryPolicy,
    limiter: Option<RateLimiter>,
}

impl HttpClient {
    /// Client with default settings and no base URL
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Client for `config`
    ///
    /// Fails on header names or values that cannot be sent.
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .default_headers(header_map(&config.headers)?)
            .build()?;

        Ok(Self {
            client,
            base_url: config
                .base_url
                .map(|base| base.trim_end_matches('/').to_string()),
            timeout: config.timeout,
            retry: config.retry,
            limiter: config.rate_limit.as_ref().map(RateLimiter::new),
        })
    }

    /// Retry policy in use
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Whether requests are paced by a token bucket
    pub fn has_rate_limiter(&self) -> bool {
        self.limiter.is_some()
    }

    /// GET `path_and_query`, retrying transient failures
    ///
    /// Non-success statuses come back as [`Error::HttpStatus`] carrying the
    /// response body, or [`Error::RateLimited`] for a final 429.
    pub async fn get(&self, path_and_query: &str) -> Result<Response> {
        let url = self.resolve(path_and_query)?;
        let mut attempt = 0;

        loop {
            if let Some(limiter) = &self.limiter {
                limiter.wait().await;
            }

            match self.attempt(&url, attempt).await {
                Attempt::Done(response) => {
                    debug!("GET {} -> {}", url, response.status());
                    return Ok(response);
                }
                Attempt::Fail(error) => return Err(error),
                Attempt::Retry { error, wait } => {
                    attempt += 1;
                    warn!(
                        "GET {} failed ({}), retry {}/{} in {:?}",
                        url, error, attempt, self.retry.max_retries, wait
                    );
                    tokio::time::sleep(wait).await;
                }
            }
        }
    }

    /// GET `path_and_query` and decode the JSON body
    pub async fn get_json<T: DeserializeOwned>(&self, path_and_query: &str) -> Result<T> {
        let response = self.get(path_and_query).await?;
        Ok(response.json().await?)
    }

    async fn attempt(&self, url: &Url, attempt: u32) -> Attempt {
        let error = match self.client.get(url.clone()).send().await {
            Ok(response) if response.status().is_success() => return Attempt::Done(response),
            Ok(response) => status_error(response).await,
            Err(e) if e.is_timeout() => Error::Timeout {
                timeout_ms: self.timeout.as_millis() as u64,
            },
            Err(e) => Error::Http(e),
        };

        let transient = match &error {
            Error::Http(e) => e.is_connect(),
            other => other.is_retryable(),
        };
        if !transient || attempt >= self.retry.max_retries {
            return Attempt::Fail(error);
        }

        let wait = match &error {
            Error::RateLimited {
                retry_after_seconds,
            } => Duration::from_secs(*retry_after_seconds),
            _ => self.retry.delay(attempt),
        };
        Attempt::Retry { error, wait }
    }

    fn resolve(&self, path_and_query: &str) -> Result<Url> {
        let joined = match &self.base_url {
            Some(base) => format!("{}/{}", base, path_and_query.trim_start_matches('/')),
            None => path_and_query.to_string(),
        };
        Ok(Url::parse(&joined)?)
    }
}

async fn status_error(response: Response) -> Error {
    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after_seconds = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
        return Error::RateLimited {
            retry_after_seconds,
        };
    }

    let body = response.text().await.unwrap_or_default();
    Error::http_status(status.as_u16(), body)
}

fn header_map(headers: &HashMap<String, String>) -> Result<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (key, value) in headers {
        let name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|_| Error::invalid_value("http.headers", format!("bad header name '{key}'")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| Error::invalid_value("http.headers", format!("bad value for '{key}'")))?;
        map.insert(name, value);
    }
    Ok(map)
}
