//! Collection fetcher types and trait

use crate::error::Result;
use crate::query::ListQuery;
use crate::types::Customer;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One fetched page of the collection
///
/// Replaced wholesale on every fetch; items keep the server's order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult {
    /// Records on this page
    pub items: Vec<Customer>,
    /// Total number of matching records reported by the server
    pub total_count: u64,
}

impl PageResult {
    /// Create a page
    pub fn new(items: Vec<Customer>, total_count: u64) -> Self {
        Self { items, total_count }
    }

    /// Number of records on this page
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the page has no records
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Source of collection pages
///
/// `refresh` re-issues the request for `query` and resolves once the page has
/// loaded. Dropping the returned future cancels the request.
#[async_trait]
pub trait CollectionFetcher: Send + Sync {
    /// Fetch the page described by `query`
    async fn refresh(&self, query: &ListQuery) -> Result<PageResult>;
}

#[async_trait]
impl<F: CollectionFetcher + ?Sized> CollectionFetcher for Arc<F> {
    async fn refresh(&self, query: &ListQuery) -> Result<PageResult> {
        (**self).refresh(query).await
    }
}

#[async_trait]
impl<F: CollectionFetcher + ?Sized> CollectionFetcher for Box<F> {
    async fn refresh(&self, query: &ListQuery) -> Result<PageResult> {
        (**self).refresh(query).await
    }
}
