//! Pagination module
//!
//! Cursor pagination over GraphQL connections shaped as
//! `{ <resource>: { nodes: [...], pageInfo: { hasNextPage, endCursor } } }`.
//!
//! # Overview
//!
//! `CursorPaginator` turns a query template plus a resource key into a lazy
//! stream of nodes. Pages are fetched one at a time through a
//! `GraphQlTransport`, each request carrying the previous page's
//! `endCursor` as `after`. The stream ends when the server reports no next
//! page, returns an empty page, or the item cap has been reached at a page
//! boundary.

mod cursor;
mod types;

pub use cursor::CursorPaginator;
pub use types::{Page, PageInfo, PaginationRequest, PaginationState, DEFAULT_PAGE_SIZE};
