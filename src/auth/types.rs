//! Auth configuration types

/// Authentication configuration for a connector
#[derive(Clone, Default)]
pub enum AuthConfig {
    /// No authentication required
    #[default]
    None,

    /// Bearer token authentication (`Authorization: Bearer <token>`)
    Bearer {
        /// The bearer token, e.g. an OAuth access token or an API key
        token: String,
    },
}

impl AuthConfig {
    /// Bearer token auth
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }
}

// Secrets stay out of logs and panic messages.
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthConfig::None => f.write_str("None"),
            AuthConfig::Bearer { .. } => f.debug_struct("Bearer").finish_non_exhaustive(),
        }
    }
}
