//! HTTP-backed collection fetcher
//!
//! Issues `GET /{resource}?{q,offset,limit}` and decodes
//! `{ "<resource>": [...], "count": n }`.

use super::types::{CollectionFetcher, PageResult};
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::query::ListQuery;
use crate::types::Customer;
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

/// Default collection resource
pub const DEFAULT_RESOURCE: &str = "customers";

/// Default key of the total count in the response body
pub const DEFAULT_COUNT_KEY: &str = "count";

/// Fetches pages of a named collection over HTTP
#[derive(Debug)]
pub struct HttpCollectionFetcher {
    client: HttpClient,
    resource: String,
    items_key: String,
    count_key: String,
}

impl HttpCollectionFetcher {
    /// Fetcher for `resource`, reading items from the key of the same name
    pub fn new(client: HttpClient, resource: impl Into<String>) -> Self {
        let resource = resource.into();
        Self {
            client,
            items_key: resource.clone(),
            resource,
            count_key: DEFAULT_COUNT_KEY.to_string(),
        }
    }

    /// Fetcher for the `customers` collection
    pub fn customers(client: HttpClient) -> Self {
        Self::new(client, DEFAULT_RESOURCE)
    }

    /// Read items from a different response key
    #[must_use]
    pub fn with_items_key(mut self, key: impl Into<String>) -> Self {
        self.items_key = key.into();
        self
    }

    /// Read the total count from a different response key
    #[must_use]
    pub fn with_count_key(mut self, key: impl Into<String>) -> Self {
        self.count_key = key.into();
        self
    }

    /// Collection resource name
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Request path for a query, e.g. `/customers?offset=0&limit=50`
    pub fn request_path(&self, query: &ListQuery) -> String {
        format!("/{}{}", self.resource.trim_matches('/'), query.search())
    }

    /// Decode a response body into a page
    ///
    /// A missing count falls back to the number of items on the page.
    pub fn parse_page(&self, body: Value) -> Result<PageResult> {
        let Value::Object(mut map) = body else {
            return Err(Error::decode("expected a JSON object"));
        };

        let items = match map.remove(&self.items_key) {
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(Error::decode(format!(
                    "'{}' is not an array: {}",
                    self.items_key, other
                )))
            }
            None => {
                return Err(Error::decode(format!(
                    "missing '{}' in response",
                    self.items_key
                )))
            }
        };

        let items: Vec<Customer> = items
            .into_iter()
            .map(serde_json::from_value)
            .collect::<std::result::Result<_, _>>()?;

        let total_count = map
            .get(&self.count_key)
            .and_then(Value::as_u64)
            .unwrap_or(items.len() as u64);

        Ok(PageResult::new(items, total_count))
    }
}

#[async_trait]
impl CollectionFetcher for HttpCollectionFetcher {
    async fn refresh(&self, query: &ListQuery) -> Result<PageResult> {
        let path = self.request_path(query);
        let body: Value = self.client.get_json(&path).await?;
        let page = self.parse_page(body)?;
        debug!(
            "Fetched {} {} of {} from {}",
            page.len(),
            self.resource,
            page.total_count,
            path
        );
        Ok(page)
    }
}
