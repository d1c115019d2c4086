//! Query codec module
//!
//! Derives the canonical list query from a URL query string and serializes it
//! back.
//!
//! # URL parameters
//!
//! - `q` - free-text filter, omitted when empty
//! - `offset` - index of the first record, default `0`
//! - `limit` - page size, default `50`

mod codec;
mod types;

pub use codec::{
    decode, decode_or_default, decode_with, encode, query_part, PARAM_LIMIT, PARAM_OFFSET,
    PARAM_Q,
};
pub use types::{ListQuery, DEFAULT_LIMIT, DEFAULT_OFFSET};
