//! GraphQL wire types

use crate::error::{Error, Result};
use crate::types::{JsonValue, Variables};
use serde::{Deserialize, Serialize};

/// Request body sent to a GraphQL endpoint
#[derive(Debug, Clone, Serialize)]
pub struct GraphQlRequest<'a> {
    /// Query document
    pub query: &'a str,
    /// Variables, omitted when empty
    #[serde(skip_serializing_if = "Variables::is_empty")]
    pub variables: &'a Variables,
}

impl<'a> GraphQlRequest<'a> {
    /// Create a new request
    pub fn new(query: &'a str, variables: &'a Variables) -> Self {
        Self { query, variables }
    }
}

/// A single entry of a GraphQL `errors` array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQlError {
    /// Human-readable message
    pub message: String,
    /// Path to the failing field, if reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<JsonValue>>,
    /// Server-specific details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<JsonValue>,
}

/// Response body returned by a GraphQL endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphQlResponse {
    /// Result data
    #[serde(default)]
    pub data: Option<JsonValue>,
    /// Errors reported by the server
    #[serde(default)]
    pub errors: Option<Vec<GraphQlError>>,
}

impl GraphQlResponse {
    /// First reported error, if any
    pub fn first_error(&self) -> Option<&GraphQlError> {
        self.errors.as_ref().and_then(|errors| errors.first())
    }

    /// Unwrap the `data` member
    ///
    /// A response carrying errors fails with the first error's message,
    /// even when partial data is present.
    pub fn into_data(self) -> Result<JsonValue> {
        if let Some(error) = self.first_error() {
            return Err(Error::graphql(error.message.clone()));
        }

        match self.data {
            Some(data) if !data.is_null() => Ok(data),
            _ => Err(Error::decode("GraphQL response has no data")),
        }
    }
}
