//! Settings for the connectors
//!
//! Settings come from a YAML file and/or the environment:
//!
//! ```yaml
//! http:
//!   timeout_secs: 30
//!   rate_limit:
//!     requests_per_second: 5
//!     burst_size: 5
//! jobber:
//!   access_token: "..."
//!   graphql_version: "2025-01-20"
//! reform:
//!   api_key: "..."
//! ```
//!
//! `FLOWLINK_JOBBER_ACCESS_TOKEN` and `FLOWLINK_REFORM_API_KEY` override the
//! credentials from the file.

use crate::connectors::{JobberApp, JobberConfig, ReformApp, ReformConfig};
use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Environment variable overriding the Jobber access token
pub const ENV_JOBBER_ACCESS_TOKEN: &str = "FLOWLINK_JOBBER_ACCESS_TOKEN";

/// Environment variable overriding the Reform API key
pub const ENV_REFORM_API_KEY: &str = "FLOWLINK_REFORM_API_KEY";

// ============================================================================
// HTTP Settings
// ============================================================================

/// HTTP settings shared by all connectors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpSettings {
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Client-side rate limit (off when absent)
    #[serde(default)]
    pub rate_limit: Option<RateLimiterConfig>,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: None,
            rate_limit: None,
        }
    }
}

impl HttpSettings {
    /// HTTP client config for these settings
    pub fn client_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .maybe_rate_limit(self.rate_limit.clone());
        if let Some(agent) = &self.user_agent {
            builder = builder.user_agent(agent.clone());
        }
        builder.build()
    }
}

// ============================================================================
// Settings
// ============================================================================

/// Top-level settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Shared HTTP settings
    #[serde(default)]
    pub http: HttpSettings,

    /// Jobber connector settings
    #[serde(default)]
    pub jobber: Option<JobberConfig>,

    /// Reform connector settings
    #[serde(default)]
    pub reform: Option<ReformConfig>,
}

impl Settings {
    /// Load settings from a YAML file, then apply environment overrides
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::file_not_found(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)?;
        let mut settings = Self::from_yaml_str(&content)?;
        settings.apply_env();
        debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Settings from the environment only
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        settings.apply_env();
        settings
    }

    /// Parse settings from YAML
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let settings: Settings = serde_yaml::from_str(content)?;
        if settings.http.timeout_secs == 0 {
            return Err(Error::invalid_value("http.timeout_secs", "must be positive"));
        }
        Ok(settings)
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Apply credential overrides from a variable lookup
    ///
    /// Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(token) = non_empty(ENV_JOBBER_ACCESS_TOKEN) {
            debug!("Jobber access token taken from {ENV_JOBBER_ACCESS_TOKEN}");
            match self.jobber.as_mut() {
                Some(jobber) => jobber.access_token = token,
                None => self.jobber = Some(JobberConfig::new(token)),
            }
        }

        if let Some(key) = non_empty(ENV_REFORM_API_KEY) {
            debug!("Reform API key taken from {ENV_REFORM_API_KEY}");
            match self.reform.as_mut() {
                Some(reform) => reform.api_key = key,
                None => self.reform = Some(ReformConfig::new(key)),
            }
        }
    }

    /// Jobber settings, validated
    pub fn jobber(&self) -> Result<&JobberConfig> {
        let config = self
            .jobber
            .as_ref()
            .ok_or_else(|| Error::missing_field("jobber.access_token"))?;
        config.validate()?;
        Ok(config)
    }

    /// Reform settings, validated
    pub fn reform(&self) -> Result<&ReformConfig> {
        let config = self
            .reform
            .as_ref()
            .ok_or_else(|| Error::missing_field("reform.api_key"))?;
        config.validate()?;
        Ok(config)
    }

    /// Build the Jobber client
    pub fn jobber_app(&self) -> Result<JobberApp> {
        JobberApp::with_http_config(self.jobber()?, self.http.client_config())
    }

    /// Build the Reform client
    pub fn reform_app(&self) -> Result<ReformApp> {
        ReformApp::with_http_config(self.reform()?, self.http.client_config())
    }
}
