//! Query string codec
//!
//! Maps between [`ListQuery`] and the `q`/`offset`/`limit` URL parameters.

use super::types::ListQuery;
use crate::error::{Error, Result};
use tracing::warn;
use url::form_urlencoded;

/// Parameter name of the free-text filter
pub const PARAM_Q: &str = "q";

/// Parameter name of the page offset
pub const PARAM_OFFSET: &str = "offset";

/// Parameter name of the page size
pub const PARAM_LIMIT: &str = "limit";

/// Decode a raw query string, filling defaults for absent parameters
///
/// Accepts the string with or without a leading `?`. Empty values count as
/// absent. Non-numeric `offset`/`limit`, or a zero `limit`, is an
/// [`Error::MalformedQuery`]. Unknown keys are ignored and the last
/// occurrence of a repeated key wins.
pub fn decode(raw: &str) -> Result<ListQuery> {
    decode_with(raw, &ListQuery::default())
}

/// Decode a raw query string using `defaults` for absent parameters
pub fn decode_with(raw: &str, defaults: &ListQuery) -> Result<ListQuery> {
    let raw = raw.strip_prefix('?').unwrap_or(raw);
    let mut query = defaults.clone();

    for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
        match key.as_ref() {
            PARAM_Q => query.q = value.into_owned(),
            PARAM_OFFSET if !value.is_empty() => {
                query.offset = parse_number(PARAM_OFFSET, &value)?;
            }
            PARAM_LIMIT if !value.is_empty() => {
                let limit = parse_number(PARAM_LIMIT, &value)?;
                if limit == 0 {
                    return Err(Error::malformed_query(PARAM_LIMIT, value));
                }
                query.limit = limit;
            }
            _ => {}
        }
    }

    Ok(query)
}

/// Decode, falling back to `defaults` when the query is malformed
///
/// The error is handed back so the caller can surface a warning.
pub fn decode_or_default(raw: &str, defaults: &ListQuery) -> (ListQuery, Option<Error>) {
    match decode_with(raw, defaults) {
        Ok(query) => (query, None),
        Err(e) => {
            warn!("Ignoring malformed list query '{}': {}", raw, e);
            (defaults.clone(), Some(e))
        }
    }
}

/// Encode a query as `q=..&offset=..&limit=..`
///
/// `q` is omitted when empty. `offset` and `limit` are always written so the
/// page window survives a reload. No leading `?`.
pub fn encode(query: &ListQuery) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    if !query.q.is_empty() {
        serializer.append_pair(PARAM_Q, &query.q);
    }
    serializer.append_pair(PARAM_OFFSET, &query.offset.to_string());
    serializer.append_pair(PARAM_LIMIT, &query.limit.to_string());
    serializer.finish()
}

/// Query portion of a location such as `/a/customers?offset=50#top`
pub fn query_part(location: &str) -> &str {
    let without_fragment = location.split('#').next().unwrap_or("");
    match without_fragment.split_once('?') {
        Some((_, query)) => query,
        None => "",
    }
}

fn parse_number(param: &str, value: &str) -> Result<u32> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| Error::malformed_query(param, value))
}
