// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # flowlink
//!
//! Connector glue for workflow automation: API clients for third-party
//! business services, the option-loaders ("pickers") that fill workflow
//! dropdowns, and a generic GraphQL cursor paginator.
//!
//! ## Features
//!
//! - **Jobber**: field-service management over GraphQL, with client and
//!   property pickers and paginated listings
//! - **Reform**: structured field extraction from documents or text
//! - **Cursor Pagination**: lazy `Stream` over Relay-style connections
//!   (`nodes` + `pageInfo`), with an item cap checked between pages
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use flowlink::connectors::{JobberApp, JobberConfig};
//! use flowlink::Result;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let app = JobberApp::new(&JobberConfig::new("access-token"))?;
//!
//!     // Dropdown options
//!     for option in app.client_options().await? {
//!         println!("{} => {}", option.label, option.value);
//!     }
//!
//!     // Up to 50 clients, fetched 10 per page
//!     let clients = app.list_clients(50).await?;
//!     println!("{} clients", clients.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                 CLI  /  Settings (YAML)                  │
//! └──────────────────────────────────────────────────────────┘
//!                              │
//! ┌────────────────────────────┴─────────────────────────────┐
//! │   Jobber (pickers, listings)   │   Reform (extraction)   │
//! ├────────────────────────────────┤                         │
//! │ Cursor Paginator │  GraphQL    │                         │
//! ├──────────────────┴─────────────┴─────────────────────────┤
//! │        HTTP client (auth, timeout, rate limit)           │
//! └──────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Authentication
pub mod auth;

/// HTTP client with rate limiting
pub mod http;

/// GraphQL request/response handling
pub mod graphql;

/// Cursor pagination over GraphQL connections
pub mod pagination;

/// Third-party connectors
pub mod connectors;

/// Settings file and environment overrides
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::Settings;
pub use graphql::{GraphQlClient, GraphQlTransport};
pub use pagination::{CursorPaginator, PaginationRequest};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
