//! Collection fetcher module
//!
//! Loads one page of a remote collection for a [`ListQuery`](crate::query::ListQuery).

mod collection;
mod types;

pub use collection::{HttpCollectionFetcher, DEFAULT_COUNT_KEY, DEFAULT_RESOURCE};
pub use types::{CollectionFetcher, PageResult};
