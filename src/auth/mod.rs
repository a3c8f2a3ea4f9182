//! Authentication module
//!
//! Supports: no auth and Bearer token
//!
//! Credentials are static: they are supplied by the workflow platform
//! (or the settings file) and applied verbatim to every request.

mod authenticator;
mod types;

pub use authenticator::Authenticator;
pub use types::AuthConfig;
