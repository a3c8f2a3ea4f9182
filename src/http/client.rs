//! HTTP client for connector requests
//!
//! Provides the transport every connector sits on:
//! - Base URL joining and default headers
//! - Authentication via the auth module
//! - Optional client-side rate limiting
//! - Non-2xx responses turned into `Error::HttpStatus`
//!
//! Requests are sent once, with the client-wide timeout. Failures surface
//! directly to the caller.

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use crate::auth::{AuthConfig, Authenticator};
use crate::error::{Error, Result};
use reqwest::multipart::Form;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL for all requests
    pub base_url: Option<String>,
    /// Request timeout
    pub timeout: Duration,
    /// Rate limiter configuration
    pub rate_limit: Option<RateLimiterConfig>,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(30),
            rate_limit: None,
            default_headers: HashMap::new(),
            user_agent: format!("flowlink/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set or clear the rate limiter
    pub fn maybe_rate_limit(mut self, config: Option<RateLimiterConfig>) -> Self {
        self.config.rate_limit = config;
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// HTTP client with authentication and optional rate limiting
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    authenticator: Option<Authenticator>,
    rate_limiter: Option<RateLimiter>,
}

impl HttpClient {
    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Ok(Self {
            client,
            config,
            authenticator: None,
            rate_limiter,
        })
    }

    /// Create a client with authentication
    pub fn with_auth(config: HttpClientConfig, auth_config: AuthConfig) -> Result<Self> {
        let mut client = Self::with_config(config)?;
        client.authenticator = Some(Authenticator::new(auth_config));
        Ok(client)
    }

    /// POST a JSON body and parse the JSON response
    pub async fn post_json<T: DeserializeOwned>(&self, url: &str, body: Value) -> Result<T> {
        let full_url = self.build_url(url);
        let req = self.prepare(Method::POST, &full_url)?.json(&body);
        let response = self.send(req, &Method::POST, &full_url).await?;
        parse_json(response).await
    }

    /// POST a multipart form and parse the JSON response
    ///
    /// The `Content-Type` header (with its boundary) is set by the form itself.
    pub async fn post_multipart_json<T: DeserializeOwned>(
        &self,
        url: &str,
        form: Form,
    ) -> Result<T> {
        let full_url = self.build_url(url);
        let req = self.prepare(Method::POST, &full_url)?.multipart(form);
        let response = self.send(req, &Method::POST, &full_url).await?;
        parse_json(response).await
    }

    /// Download a resource from an absolute URL
    ///
    /// Neither the base URL, default headers nor credentials are applied:
    /// the target is a third-party host.
    pub async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let parsed = url::Url::parse(url)?;
        let req = self.client.get(parsed.as_str());
        let response = self.send(req, &Method::GET, parsed.as_str()).await?;
        let bytes = response.bytes().await?;
        debug!("Downloaded {} bytes from {}", bytes.len(), parsed);
        Ok(bytes.to_vec())
    }

    /// Build full URL from path
    pub(crate) fn build_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        match &self.config.base_url {
            Some(base) => {
                let base = base.trim_end_matches('/');
                let path = path.trim_start_matches('/');
                format!("{base}/{path}")
            }
            None => path.to_string(),
        }
    }

    /// Build a request with default headers and auth applied
    fn prepare(&self, method: Method, full_url: &str) -> Result<RequestBuilder> {
        let mut req = self.client.request(method, full_url);

        for (key, value) in &self.config.default_headers {
            req = req.header(key.as_str(), value.as_str());
        }

        if let Some(ref auth) = self.authenticator {
            req = auth.apply(req)?;
        }

        Ok(req)
    }

    async fn send(&self, req: RequestBuilder, method: &Method, full_url: &str) -> Result<Response> {
        if let Some(ref limiter) = self.rate_limiter {
            limiter.wait().await;
        }

        debug!("Sending request: {} {}", method, full_url);

        let response = req.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout {
                    timeout_ms: self.config.timeout.as_millis() as u64,
                }
            } else {
                Error::Http(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                "Request failed with {}: {} {}",
                status.as_u16(),
                method,
                full_url
            );
            return Err(Error::http_status(status.as_u16(), body));
        }

        debug!("Request succeeded: {} {}", method, full_url);
        Ok(response)
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("has_authenticator", &self.authenticator.is_some())
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}

/// Decode a response body as JSON
async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let text = response.text().await?;
    serde_json::from_str(&text)
        .map_err(|e| Error::decode(format!("Response is not valid JSON: {e}")))
}
