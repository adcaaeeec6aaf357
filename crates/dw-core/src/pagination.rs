use crate::error::GithubError;
use futures::stream::{self, Stream};
use std::future::Future;

/// Page size requested from every paginated endpoint.
pub const PER_PAGE: u32 = 100;

enum Cursor<F> {
    Next { page: u32, fetch: F },
    Exhausted,
}

/// Lazily walks a paginated endpoint starting at page 1.
///
/// Each item is one page. The stream ends after the first page shorter than
/// [`PER_PAGE`]; consumers may also stop early by dropping it.
pub fn pages<'a, T, F, Fut>(fetch: F) -> impl Stream<Item = Result<Vec<T>, GithubError>> + Send + 'a
where
    T: Send + 'a,
    F: FnMut(u32) -> Fut + Send + 'a,
    Fut: Future<Output = Result<Vec<T>, GithubError>> + Send + 'a,
{
    stream::try_unfold(Cursor::Next { page: 1, fetch }, |cursor| async move {
        let Cursor::Next { page, mut fetch } = cursor else {
            return Ok(None);
        };
        let items = fetch(page).await?;
        let next = if items.len() < PER_PAGE as usize {
            Cursor::Exhausted
        } else {
            Cursor::Next {
                page: page + 1,
                fetch,
            }
        };
        Ok(Some((items, next)))
    })
}
