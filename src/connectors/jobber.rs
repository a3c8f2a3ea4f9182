//! Jobber connector
//!
//! Jobber exposes a single GraphQL endpoint. Every request carries the
//! OAuth access token as a bearer token and pins the schema version with
//! the `X-JOBBER-GRAPHQL-VERSION` header.

use super::validate_base_url;
use crate::auth::AuthConfig;
use crate::error::{Error, Result};
use crate::graphql::{GraphQlClient, GraphQlTransport};
use crate::http::{HttpClient, HttpClientConfig};
use crate::pagination::{CursorPaginator, PaginationRequest};
use crate::types::{JsonValue, PropOption, Variables};
use async_trait::async_trait;
use futures::Stream;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Connector name
pub const APP_NAME: &str = "jobber";

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.getjobber.com/api";

/// Schema version requested when none is configured
pub const DEFAULT_GRAPHQL_VERSION: &str = "2025-01-20";

/// Header carrying the schema version
pub const GRAPHQL_VERSION_HEADER: &str = "X-JOBBER-GRAPHQL-VERSION";

const GRAPHQL_PATH: &str = "/graphql";

const CLIENT_OPTIONS_QUERY: &str = "query GetClients {
  clients {
    nodes {
      id
      firstName
      lastName
      companyName
    }
  }
}";

const LIST_CLIENTS_QUERY: &str = "query ListClients($first: Int, $after: String) {
  clients(first: $first, after: $after) {
    nodes {
      id
      firstName
      lastName
      companyName
    }
    pageInfo {
      hasNextPage
      endCursor
    }
  }
}";

// ============================================================================
// Configuration
// ============================================================================

/// Jobber credentials and endpoint settings
#[derive(Clone, Serialize, Deserialize)]
pub struct JobberConfig {
    /// OAuth access token issued to the connected account
    #[serde(default)]
    pub access_token: String,

    /// API base URL (the GraphQL endpoint is `<base_url>/graphql`)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Value of the `X-JOBBER-GRAPHQL-VERSION` header
    #[serde(default = "default_graphql_version")]
    pub graphql_version: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_graphql_version() -> String {
    DEFAULT_GRAPHQL_VERSION.to_string()
}

impl JobberConfig {
    /// Config for the production API with the given access token
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            base_url: default_base_url(),
            graphql_version: default_graphql_version(),
        }
    }

    /// Override the base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Check the config is usable
    pub fn validate(&self) -> Result<()> {
        if self.access_token.trim().is_empty() {
            return Err(Error::missing_field("jobber.access_token"));
        }
        if self.graphql_version.trim().is_empty() {
            return Err(Error::missing_field("jobber.graphql_version"));
        }
        validate_base_url("jobber.base_url", &self.base_url)
    }
}

impl std::fmt::Debug for JobberConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobberConfig")
            .field("base_url", &self.base_url)
            .field("graphql_version", &self.graphql_version)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Response Nodes
// ============================================================================

/// Client record as returned by the client queries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientNode {
    /// Encoded global id
    pub id: String,
    /// Contact first name
    #[serde(default)]
    pub first_name: Option<String>,
    /// Contact last name
    #[serde(default)]
    pub last_name: Option<String>,
    /// Company name, when the client is a business
    #[serde(default)]
    pub company_name: Option<String>,
}

impl ClientNode {
    /// Display label: the company name, or the contact's full name
    pub fn label(&self) -> String {
        match self.company_name.as_deref() {
            Some(company) if !company.is_empty() => company.to_string(),
            _ => format!(
                "{} {}",
                self.first_name.as_deref().unwrap_or_default(),
                self.last_name.as_deref().unwrap_or_default()
            )
            .trim()
            .to_string(),
        }
    }
}

/// Street address of a property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Street line
    #[serde(default)]
    pub street: Option<String>,
}

/// Property record as returned by the property queries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyNode {
    /// Encoded global id
    pub id: String,
    /// Service address
    #[serde(default)]
    pub address: Option<Address>,
}

impl PropertyNode {
    /// Display label: the street line, falling back to the id
    pub fn label(&self) -> String {
        self.address
            .as_ref()
            .and_then(|a| a.street.as_deref())
            .filter(|s| !s.is_empty())
            .unwrap_or(self.id.as_str())
            .to_string()
    }
}

// ============================================================================
// App
// ============================================================================

/// Jobber API client
#[derive(Debug)]
pub struct JobberApp {
    graphql: GraphQlClient,
}

impl JobberApp {
    /// Create a client with default HTTP settings
    pub fn new(config: &JobberConfig) -> Result<Self> {
        Self::with_http_config(config, HttpClientConfig::default())
    }

    /// Create a client on top of shared HTTP settings (timeout, rate limit)
    pub fn with_http_config(config: &JobberConfig, http: HttpClientConfig) -> Result<Self> {
        config.validate()?;

        let mut http = http;
        http.base_url = Some(config.base_url.clone());
        http.default_headers.insert(
            GRAPHQL_VERSION_HEADER.to_string(),
            config.graphql_version.clone(),
        );

        let client = HttpClient::with_auth(http, AuthConfig::bearer(config.access_token.clone()))?;
        debug!(
            "Jobber client ready: {} (schema {})",
            config.base_url, config.graphql_version
        );

        Ok(Self {
            graphql: GraphQlClient::new(client, GRAPHQL_PATH),
        })
    }

    /// Run one GraphQL query and return its `data`
    pub async fn post(&self, query: &str, variables: &Variables) -> Result<JsonValue> {
        self.graphql.execute(query, variables).await
    }

    // ------------------------------------------------------------------------
    // Pickers
    // ------------------------------------------------------------------------

    /// Options for the "Client ID" dropdown
    pub async fn client_options(&self) -> Result<Vec<PropOption>> {
        let data = self.post(CLIENT_OPTIONS_QUERY, &Variables::new()).await?;
        let clients: Vec<ClientNode> = nodes_of(&data, "clients")?;

        Ok(clients
            .into_iter()
            .map(|client| PropOption::new(client.label(), client.id))
            .collect())
    }

    /// Options for the "Property ID" dropdown, optionally narrowed to one client
    pub async fn property_options(&self, client_id: Option<&str>) -> Result<Vec<PropOption>> {
        let query = property_options_query(client_id)?;
        let data = self.post(&query, &Variables::new()).await?;
        let properties: Vec<PropertyNode> = nodes_of(&data, "properties")?;

        Ok(properties
            .into_iter()
            .map(|property| PropOption::new(property.label(), property.id))
            .collect())
    }

    // ------------------------------------------------------------------------
    // Pagination
    // ------------------------------------------------------------------------

    /// Lazily stream the nodes of a paginated query
    pub fn paginate<'a, T>(
        &'a self,
        request: PaginationRequest,
    ) -> impl Stream<Item = Result<T>> + Send + 'a
    where
        T: DeserializeOwned + Send + 'a,
    {
        CursorPaginator::new(self).paginate(request)
    }

    /// Collect the nodes of a paginated query into memory
    pub async fn get_paginated_resources<T>(&self, request: PaginationRequest) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Send,
    {
        CursorPaginator::new(self).collect_all(request).await
    }

    /// All clients, up to `max` (rounded up to a page)
    pub async fn list_clients(&self, max: usize) -> Result<Vec<ClientNode>> {
        self.get_paginated_resources(PaginationRequest::new(LIST_CLIENTS_QUERY, "clients", max))
            .await
    }

    /// All properties, optionally of one client, up to `max` (rounded up to a page)
    pub async fn list_properties(
        &self,
        client_id: Option<&str>,
        max: usize,
    ) -> Result<Vec<PropertyNode>> {
        let query = list_properties_query(client_id)?;
        self.get_paginated_resources(PaginationRequest::new(query, "properties", max))
            .await
    }
}

#[async_trait]
impl GraphQlTransport for JobberApp {
    async fn execute(&self, query: &str, variables: &Variables) -> Result<JsonValue> {
        self.post(query, variables).await
    }
}

// ============================================================================
// Query Builders
// ============================================================================

/// `(filter: { clientId: "<id>" })` with the id escaped as a string literal
fn client_filter(client_id: Option<&str>) -> Result<String> {
    match client_id.filter(|id| !id.is_empty()) {
        Some(id) => Ok(format!(
            "(filter: {{ clientId: {} }})",
            serde_json::to_string(id)?
        )),
        None => Ok(String::new()),
    }
}

fn property_options_query(client_id: Option<&str>) -> Result<String> {
    let filter = client_filter(client_id)?;
    Ok(format!(
        "query GetProperties {{
  properties{filter} {{
    nodes {{
      id
      address {{
        street
      }}
    }}
  }}
}}"
    ))
}

fn list_properties_query(client_id: Option<&str>) -> Result<String> {
    let filter = match client_id.filter(|id| !id.is_empty()) {
        Some(id) => format!(", filter: {{ clientId: {} }}", serde_json::to_string(id)?),
        None => String::new(),
    };
    Ok(format!(
        "query ListProperties($first: Int, $after: String) {{
  properties(first: $first, after: $after{filter}) {{
    nodes {{
      id
      address {{
        street
      }}
    }}
    pageInfo {{
      hasNextPage
      endCursor
    }}
  }}
}}"
    ))
}

/// Decode `data.<key>.nodes` of a non-paginated query
fn nodes_of<T: DeserializeOwned>(data: &JsonValue, key: &str) -> Result<Vec<T>> {
    let nodes = data
        .get(key)
        .and_then(|resource| resource.get("nodes"))
        .ok_or_else(|| Error::missing_resource(key))?;

    serde_json::from_value(nodes.clone())
        .map_err(|e| Error::decode(format!("Failed to decode '{key}' nodes: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_client_label_prefers_company() {
        let client = ClientNode {
            id: "1".to_string(),
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            company_name: Some("Analytical Engines".to_string()),
        };
        assert_eq!(client.label(), "Analytical Engines");
    }

    #[test]
    fn test_client_label_falls_back_to_name() {
        let client = ClientNode {
            id: "1".to_string(),
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            company_name: Some(String::new()),
        };
        assert_eq!(client.label(), "Ada Lovelace");

        let client = ClientNode {
            id: "2".to_string(),
            first_name: Some("Grace".to_string()),
            last_name: None,
            company_name: None,
        };
        assert_eq!(client.label(), "Grace");
    }

    #[test]
    fn test_property_label() {
        let property: PropertyNode =
            serde_json::from_value(json!({"id": "p1", "address": {"street": "1 Main St"}}))
                .unwrap();
        assert_eq!(property.label(), "1 Main St");

        let property: PropertyNode =
            serde_json::from_value(json!({"id": "p2", "address": null})).unwrap();
        assert_eq!(property.label(), "p2");
    }

    #[test]
    fn test_client_filter_escapes_id() {
        assert_eq!(client_filter(None).unwrap(), "");
        assert_eq!(client_filter(Some("")).unwrap(), "");
        assert_eq!(
            client_filter(Some("abc")).unwrap(),
            r#"(filter: { clientId: "abc" })"#
        );
        assert_eq!(
            client_filter(Some(r#"a"b"#)).unwrap(),
            r#"(filter: { clientId: "a\"b" })"#
        );
    }

    #[test]
    fn test_property_queries() {
        let query = property_options_query(Some("c-1")).unwrap();
        assert!(query.contains(r#"properties(filter: { clientId: "c-1" }) {"#));

        let query = property_options_query(None).unwrap();
        assert!(query.contains("properties {"));

        let query = list_properties_query(Some("c-1")).unwrap();
        assert!(query.contains(
            r#"properties(first: $first, after: $after, filter: { clientId: "c-1" })"#
        ));
        assert!(query.contains("pageInfo"));
    }

    #[test]
    fn test_nodes_of_missing_resource() {
        let err = nodes_of::<ClientNode>(&json!({"clients": {}}), "clients").unwrap_err();
        assert!(matches!(err, Error::MissingResource { .. }));
    }

    #[test]
    fn test_config_validation() {
        assert!(JobberConfig::new("token").validate().is_ok());

        let err = JobberConfig::new("").validate().unwrap_err();
        assert!(matches!(err, Error::MissingConfigField { .. }));

        let err = JobberConfig::new("token")
            .with_base_url("ftp://api.getjobber.com")
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue { .. }));

        let err = JobberConfig::new("token")
            .with_base_url("not a url")
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }

    #[test]
    fn test_config_debug_hides_token() {
        let rendered = format!("{:?}", JobberConfig::new("very-secret-token"));
        assert!(!rendered.contains("very-secret-token"));
    }

    #[test]
    fn test_config_defaults_from_yaml() {
        let config: JobberConfig = serde_yaml::from_str("access_token: abc").unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.graphql_version, DEFAULT_GRAPHQL_VERSION);
    }
}
