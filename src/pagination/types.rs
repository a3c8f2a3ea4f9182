//! Pagination types
//!
//! Page shapes, the request description and the per-run cursor state.

use crate::error::{Error, Result};
use crate::types::{JsonValue, Variables};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Page size sent as `first` unless the caller's args override it
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Continuation metadata of a page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Whether the server has more items after this page (null reads as false)
    #[serde(default, deserialize_with = "null_as_false")]
    pub has_next_page: bool,
    /// Opaque cursor of the last item in this page
    #[serde(default)]
    pub end_cursor: Option<String>,
}

fn null_as_false<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

impl PageInfo {
    /// Decode the raw `pageInfo` of a page stored under `resource_key`
    pub fn decode(raw: Option<&JsonValue>, resource_key: &str) -> Result<Self> {
        match raw {
            Some(info @ JsonValue::Object(_)) => PageInfo::deserialize(info).map_err(|e| {
                Error::decode(format!("Malformed '{resource_key}.pageInfo': {e}"))
            }),
            _ => Err(Error::decode(format!(
                "'{resource_key}' page has no pageInfo"
            ))),
        }
    }
}

/// One batch of records plus its continuation metadata, still undecoded
///
/// `pageInfo` is only read once the page's records have been handed out, so
/// a page with records but broken metadata still yields those records.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Records, in server order
    pub nodes: Vec<T>,
    /// Raw `pageInfo` member, if present
    pub page_info: Option<JsonValue>,
}

impl<T: DeserializeOwned> Page<T> {
    /// Locate the page stored under `resource_key` in a response's `data`
    /// and decode its records
    ///
    /// Absent, null or empty `nodes` decode to an empty page, which ends
    /// pagination.
    pub fn decode(data: &JsonValue, resource_key: &str) -> Result<Self> {
        let resource = match data.get(resource_key) {
            Some(JsonValue::Null) | None => return Err(Error::missing_resource(resource_key)),
            Some(JsonValue::Object(resource)) => resource,
            Some(other) => {
                return Err(Error::decode(format!(
                    "'{resource_key}' is not a page object (got {})",
                    json_kind(other)
                )))
            }
        };

        let raw_nodes = match resource.get("nodes") {
            Some(JsonValue::Null) | None => Vec::new(),
            Some(JsonValue::Array(nodes)) => nodes.clone(),
            Some(other) => {
                return Err(Error::decode(format!(
                    "'{resource_key}.nodes' is not an array (got {})",
                    json_kind(other)
                )))
            }
        };

        let nodes = raw_nodes
            .into_iter()
            .enumerate()
            .map(|(i, node)| {
                serde_json::from_value(node).map_err(|e| {
                    Error::decode(format!("Failed to decode '{resource_key}' node {i}: {e}"))
                })
            })
            .collect::<Result<Vec<T>>>()?;

        Ok(Self {
            nodes,
            page_info: resource.get("pageInfo").cloned(),
        })
    }
}

impl<T> Page<T> {
    /// Number of records in the page
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the page has no records
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

/// Description of a paginated query run
#[derive(Debug, Clone, PartialEq)]
pub struct PaginationRequest {
    /// Query document; should declare `$first` and `$after`
    pub query: String,
    /// Variables merged over `{after, first}`; these win on clashes
    pub args: Variables,
    /// Field of the response data holding the page
    pub resource_key: String,
    /// Item cap, checked between pages
    pub max: usize,
}

impl PaginationRequest {
    /// Create a request with no extra variables
    pub fn new(query: impl Into<String>, resource_key: impl Into<String>, max: usize) -> Self {
        Self {
            query: query.into(),
            args: Variables::new(),
            resource_key: resource_key.into(),
            max,
        }
    }

    /// Replace the extra variables
    #[must_use]
    pub fn with_args(mut self, args: Variables) -> Self {
        self.args = args;
        self
    }

    /// Set a single extra variable
    #[must_use]
    pub fn arg(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.args.insert(key.into(), value.into());
        self
    }

    /// Build the variables for a page request
    ///
    /// `after` is left out entirely while no cursor is known.
    pub fn variables(&self, after: Option<&str>) -> Variables {
        let mut variables = Variables::new();
        if let Some(cursor) = after {
            variables.insert("after".to_string(), JsonValue::from(cursor));
        }
        variables.insert("first".to_string(), JsonValue::from(DEFAULT_PAGE_SIZE));
        for (key, value) in &self.args {
            variables.insert(key.clone(), value.clone());
        }
        variables
    }
}

/// Tracks cursor state during one pagination run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationState {
    /// Cursor to send as `after` on the next request
    pub cursor: Option<String>,
    /// Records yielded so far
    pub counter: usize,
    /// Requests issued so far
    pub pages: usize,
    /// Is pagination complete?
    pub done: bool,
}

impl PaginationState {
    /// Create a fresh state (no cursor, nothing fetched)
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that a page request was issued
    pub fn record_request(&mut self) {
        self.pages += 1;
    }

    /// Record one yielded record
    pub fn record_item(&mut self) {
        self.counter += 1;
    }

    /// Mark pagination as complete
    pub fn mark_done(&mut self) {
        self.done = true;
    }

    /// Take the continuation metadata of a consumed page and decide whether
    /// another request is due
    pub fn advance(&mut self, page_info: PageInfo, max: usize) -> bool {
        self.cursor = page_info.end_cursor;
        if !page_info.has_next_page || self.counter >= max {
            self.mark_done();
        }
        !self.done
    }
}
