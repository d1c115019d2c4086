//! List/detail routing
//!
//! The customer section is mounted at a base path (default `/a/customers`).
//! Below it, `/` renders the list and `/:id` renders the detail view for one
//! record.

use crate::error::{Error, Result};
use crate::query::{encode, ListQuery};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use serde::{Deserialize, Serialize};

/// Default mount point of the customer section
pub const DEFAULT_MOUNT: &str = "/a/customers";

/// Characters escaped in an id placed in a path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Resolved route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum Route {
    /// The paginated list
    List,
    /// A single record
    Detail {
        /// Record identifier from the path
        id: String,
    },
}

/// Routes paths under a mount point to the list or detail view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListDetailRouter {
    mount: String,
}

impl Default for ListDetailRouter {
    fn default() -> Self {
        Self::new(DEFAULT_MOUNT)
    }
}

impl ListDetailRouter {
    /// Create a router mounted at `mount`
    pub fn new(mount: impl Into<String>) -> Self {
        let mount = mount.into();
        let trimmed = mount.trim_end_matches('/');
        Self {
            mount: if trimmed.is_empty() {
                String::new()
            } else {
                trimmed.to_string()
            },
        }
    }

    /// Mount point (no trailing slash; empty for the root)
    pub fn mount(&self) -> &str {
        &self.mount
    }

    /// Resolve a path, absolute (with the mount prefix) or relative to it
    ///
    /// Query strings and fragments are ignored.
    pub fn resolve(&self, path: &str) -> Result<Route> {
        let path_only = path
            .split(['?', '#'])
            .next()
            .unwrap_or("");

        let relative = if self.mount.is_empty() {
            path_only
        } else {
            match path_only.strip_prefix(&self.mount) {
                Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
                _ => path_only,
            }
        };

        let segments: Vec<&str> = relative.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Ok(Route::List),
            [segment] => {
                let id = percent_decode_str(segment)
                    .decode_utf8()
                    .map_err(|_| Error::route_not_found(path))?;
                Ok(Route::Detail { id: id.into_owned() })
            }
            _ => Err(Error::route_not_found(path)),
        }
    }

    /// Address of the list for a query
    pub fn list_href(&self, query: &ListQuery) -> String {
        format!("{}/?{}", self.mount, encode(query))
    }

    /// Address of a record's detail view
    ///
    /// The id is percent-encoded as a single path segment, so [`resolve`]
    /// gives it back unchanged.
    ///
    /// [`resolve`]: Self::resolve
    pub fn detail_href(&self, id: &str) -> String {
        format!("{}/{}", self.mount, utf8_percent_encode(id, SEGMENT))
    }
}
