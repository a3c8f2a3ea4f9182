//! Cursor paginator
//!
//! Drives sequential page fetches with the `after`-cursor convention and
//! yields records lazily.

use super::types::{Page, PageInfo, PaginationRequest, PaginationState};
use crate::error::Result;
use crate::graphql::GraphQlTransport;
use async_stream::try_stream;
use futures::{pin_mut, Stream, StreamExt};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Cursor-based paginator for GraphQL connections
///
/// Each call to [`CursorPaginator::paginate`] starts from the beginning;
/// no cursor is kept between calls.
#[derive(Debug, Clone, Copy)]
pub struct CursorPaginator<'a, C: ?Sized> {
    transport: &'a C,
}

impl<'a, C> CursorPaginator<'a, C>
where
    C: GraphQlTransport + ?Sized,
{
    /// Create a paginator issuing requests through `transport`
    pub fn new(transport: &'a C) -> Self {
        Self { transport }
    }

    /// Lazily stream the records of a paginated query
    ///
    /// A page is only requested once the previous one has been fully
    /// consumed, and its `pageInfo` is read after its records are yielded.
    /// The cap is checked between pages, so the last page may push the
    /// total past `request.max`. Any error ends the stream after
    /// the records already yielded.
    pub fn paginate<T>(&self, request: PaginationRequest) -> impl Stream<Item = Result<T>> + Send + 'a
    where
        T: DeserializeOwned + Send + 'a,
    {
        let transport = self.transport;

        try_stream! {
            let mut state = PaginationState::new();

            loop {
                let variables = request.variables(state.cursor.as_deref());
                state.record_request();
                debug!(
                    "Fetching page {} of '{}' (after: {:?})",
                    state.pages, request.resource_key, state.cursor
                );

                let data = transport.execute(&request.query, &variables).await?;
                let page: Page<T> = Page::decode(&data, &request.resource_key)?;

                if page.is_empty() {
                    debug!("Page {} of '{}' is empty, stopping", state.pages, request.resource_key);
                    state.mark_done();
                    break;
                }

                debug!(
                    "Page {} of '{}': {} records",
                    state.pages,
                    request.resource_key,
                    page.len()
                );

                for node in page.nodes {
                    state.record_item();
                    yield node;
                }

                // pageInfo is read only after the page's records are out
                let page_info = PageInfo::decode(page.page_info.as_ref(), &request.resource_key)?;
                debug!(
                    "Page {} of '{}': has_next_page={}",
                    state.pages, request.resource_key, page_info.has_next_page
                );

                if !state.advance(page_info, request.max) {
                    break;
                }
            }

            debug!(
                "Finished '{}': {} records in {} requests",
                request.resource_key, state.counter, state.pages
            );
        }
    }

    /// Collect every record of a paginated query into memory
    pub async fn collect_all<T>(&self, request: PaginationRequest) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Send + 'a,
    {
        let stream = self.paginate(request);
        pin_mut!(stream);

        let mut results = Vec::new();
        while let Some(record) = stream.next().await {
            results.push(record?);
        }
        Ok(results)
    }
}
