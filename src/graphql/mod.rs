//! GraphQL module
//!
//! A deliberately small GraphQL layer: a request envelope, response
//! unwrapping (the `errors` array becomes `Error::GraphQl`) and the
//! `GraphQlTransport` seam the paginator issues its page fetches through.

mod client;
mod types;

pub use client::{GraphQlClient, GraphQlTransport};
pub use types::{GraphQlError, GraphQlRequest, GraphQlResponse};
