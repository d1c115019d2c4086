//! Console configuration
//!
//! Loaded from YAML. Everything but `base_url` has a default:
//!
//! ```yaml
//! base_url: https://admin.example.com/admin
//! resource: customers
//! default_limit: 50
//! detail_mount: /a/customers
//! http:
//!   timeout_secs: 30
//!   max_retries: 3
//!   backoff: exponential
//!   rate_limit:
//!     requests_per_second: 10
//!     burst_size: 10
//!   headers:
//!     X-Console: admin
//! ```

use crate::error::{Error, Result, ResultExt};
use crate::fetch::{DEFAULT_COUNT_KEY, DEFAULT_RESOURCE};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::query::{ListQuery, DEFAULT_LIMIT};
use crate::router::DEFAULT_MOUNT;
use crate::types::BackoffType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete console configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Base URL of the admin API
    pub base_url: String,

    /// Collection resource name
    #[serde(default = "default_resource")]
    pub resource: String,

    /// Response key holding the items (defaults to the resource name)
    #[serde(default)]
    pub items_key: Option<String>,

    /// Response key holding the total count
    #[serde(default = "default_count_key")]
    pub count_key: String,

    /// Mount point of the list/detail routes
    #[serde(default = "default_detail_mount")]
    pub detail_mount: String,

    /// Page size when the URL carries none
    #[serde(default = "default_limit")]
    pub default_limit: u32,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpSettings,
}

fn default_resource() -> String {
    DEFAULT_RESOURCE.to_string()
}

fn default_count_key() -> String {
    DEFAULT_COUNT_KEY.to_string()
}

fn default_detail_mount() -> String {
    DEFAULT_MOUNT.to_string()
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

impl ConsoleConfig {
    /// Config with defaults for everything but the base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            resource: default_resource(),
            items_key: None,
            count_key: default_count_key(),
            detail_mount: default_detail_mount(),
            default_limit: default_limit(),
            http: HttpSettings::default(),
        }
    }

    /// Parse and validate YAML
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_yaml_str(&contents)
    }

    /// Check values serde cannot
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(Error::missing_field("base_url"));
        }
        url::Url::parse(&self.base_url)?;
        if self.resource.trim_matches('/').is_empty() {
            return Err(Error::invalid_value("resource", "must not be empty"));
        }
        if self.default_limit == 0 {
            return Err(Error::invalid_value("default_limit", "must be positive"));
        }
        Ok(())
    }

    /// Response key holding the items
    pub fn items_key(&self) -> &str {
        self.items_key.as_deref().unwrap_or(&self.resource)
    }

    /// Query used for parameters missing from the URL
    pub fn default_query(&self) -> ListQuery {
        ListQuery::with_limit(self.default_limit)
    }

    /// HTTP client configuration
    pub fn http_client_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .base_url(&self.base_url)
            .timeout(Duration::from_secs(self.http.timeout_secs))
            .max_retries(self.http.max_retries)
            .backoff(
                self.http.backoff,
                Duration::from_millis(self.http.initial_backoff_ms),
                Duration::from_millis(self.http.max_backoff_ms),
            );

        builder = match &self.http.rate_limit {
            Some(limit) => builder.rate_limit(limit.clone()),
            None => builder.no_rate_limit(),
        };

        for (key, value) in &self.http.headers {
            builder = builder.header(key, value);
        }

        builder.build()
    }
}

// ============================================================================
// HTTP Settings
// ============================================================================

/// HTTP client settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpSettings {
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries for transient failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Backoff strategy
    #[serde(default)]
    pub backoff: BackoffType,

    /// First backoff delay in milliseconds
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Backoff ceiling in milliseconds
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,

    /// Token bucket settings; omit to disable
    #[serde(default)]
    pub rate_limit: Option<RateLimiterConfig>,

    /// Headers sent with every request
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            backoff: BackoffType::default(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            rate_limit: None,
            headers: HashMap::new(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_initial_backoff_ms() -> u64 {
    100
}

fn default_max_backoff_ms() -> u64 {
    60_000
}
