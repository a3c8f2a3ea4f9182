//! Connectors for third-party business APIs
//!
//! Each connector bundles its auth wiring, the dropdown option-loaders
//! workflow authors pick parameters from, and thin request methods.
//!
//! - [`jobber`]: field-service management (GraphQL)
//! - [`reform`]: document data extraction (REST)

pub mod jobber;
pub mod reform;

pub use jobber::{JobberApp, JobberConfig};
pub use reform::{DocumentSource, ReformApp, ReformConfig};

use crate::error::{Error, Result};
use url::Url;

/// Names of the connectors shipped with the crate
pub fn list_builtin() -> Vec<&'static str> {
    vec![jobber::APP_NAME, reform::APP_NAME]
}

/// Check if a connector name is a built-in connector
pub fn is_builtin(name: &str) -> bool {
    list_builtin().contains(&name)
}

/// Validate a base URL override
pub(crate) fn validate_base_url(field: &str, base_url: &str) -> Result<()> {
    let url = Url::parse(base_url)?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::invalid_value(
            field,
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(())
}
