//! GraphQL client over the crate's HTTP client

use super::types::{GraphQlRequest, GraphQlResponse};
use crate::error::Result;
use crate::http::HttpClient;
use crate::types::{JsonValue, Variables};
use async_trait::async_trait;
use tracing::debug;

/// Anything that can run a GraphQL query and hand back its `data`
///
/// Implementations fail on transport errors, non-2xx statuses and
/// GraphQL `errors`.
#[async_trait]
pub trait GraphQlTransport: Send + Sync {
    /// Run `query` with `variables` and return the decoded `data` member
    async fn execute(&self, query: &str, variables: &Variables) -> Result<JsonValue>;
}

/// GraphQL client posting to a single endpoint
#[derive(Debug)]
pub struct GraphQlClient {
    http: HttpClient,
    endpoint: String,
}

impl GraphQlClient {
    /// Create a client posting to `endpoint` (absolute, or relative to the
    /// HTTP client's base URL)
    pub fn new(http: HttpClient, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }

    /// Run a query and return the raw response envelope
    pub async fn send(&self, query: &str, variables: &Variables) -> Result<GraphQlResponse> {
        let body = serde_json::to_value(GraphQlRequest::new(query, variables))?;
        self.http.post_json(&self.endpoint, body).await
    }
}

#[async_trait]
impl GraphQlTransport for GraphQlClient {
    async fn execute(&self, query: &str, variables: &Variables) -> Result<JsonValue> {
        let response = self.send(query, variables).await?;

        if response.first_error().is_some() {
            debug!(
                response = %serde_json::to_string_pretty(&response).unwrap_or_default(),
                "GraphQL request returned errors"
            );
        }

        response.into_data()
    }
}
