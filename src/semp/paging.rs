//! Cursor pagination: drains a paged SEMP collection into one ordered sequence.

use std::future::Future;

use futures_util::stream::{self, Stream, TryStreamExt};

use crate::error::TransportError;

/// Items requested per page unless configured otherwise.
pub const DEFAULT_PAGE_LIMIT: u32 = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Present while the server still holds items for this query.
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, next_cursor: Option<String>) -> Self {
        Self { items, next_cursor }
    }

    pub fn last(items: Vec<T>) -> Self {
        Self { items, next_cursor: None }
    }
}

/// Streams pages in server order, starting without a cursor and following
/// each `next_cursor` until a page arrives without one. Empty pages that
/// still carry a cursor do not stop the walk.
pub fn pages<T, F, Fut>(mut fetch_page: F) -> impl Stream<Item = Result<Page<T>, TransportError>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>, TransportError>>,
{
    // Outer None: walk finished. Some(cursor): fetch with that cursor.
    let start: Option<Option<String>> = Some(None);

    stream::try_unfold(start, move |state| {
        let request = state.map(&mut fetch_page);
        async move {
            let Some(request) = request else {
                return Ok(None);
            };
            let page = request.await?;
            let next = page.next_cursor.clone().map(Some);
            Ok::<_, TransportError>(Some((page, next)))
        }
    })
}

/// Collects every item across all pages. Fails on the first page fetch error.
pub async fn collect_all<T, F, Fut>(fetch_page: F) -> Result<Vec<T>, TransportError>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>, TransportError>>,
{
    pages(fetch_page)
        .map_ok(|page| page.items)
        .try_concat()
        .await
}

// ==========================================
// TESTS
// ==========================================
