//! Authenticator implementation
//!
//! Applies the configured credentials to outgoing requests.

use super::types::AuthConfig;
use crate::error::{Error, Result};
use reqwest::RequestBuilder;

/// Authenticator handles applying authentication to HTTP requests
#[derive(Debug, Clone)]
pub struct Authenticator {
    config: AuthConfig,
}

impl Authenticator {
    /// Create a new authenticator with the given config
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    /// Check that the configured credentials are usable
    pub fn validate(&self) -> Result<()> {
        match &self.config {
            AuthConfig::Bearer { token } if token.trim().is_empty() => {
                Err(Error::auth("Bearer token is empty"))
            }
            _ => Ok(()),
        }
    }

    /// Apply authentication to a request builder
    pub fn apply(&self, req: RequestBuilder) -> Result<RequestBuilder> {
        self.validate()?;

        match &self.config {
            AuthConfig::None => Ok(req),
            AuthConfig::Bearer { token } => Ok(req.bearer_auth(token)),
        }
    }
}
