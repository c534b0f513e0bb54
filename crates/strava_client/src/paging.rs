//! Paging instructions and the page aggregation loop shared by every list
//! endpoint.

use crate::StravaError;
use futures_util::{Stream, TryStreamExt, stream};
use std::future::Future;

/// Largest page Strava serves.
pub const MAX_PAGE_SIZE: u32 = 200;
/// Page size Strava uses when none is requested.
pub const DEFAULT_PAGE_SIZE: u32 = 30;

/// A caller's request for one page of results. Pages are 1-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Paging {
    page: u32,
    page_size: u32,
}

impl Paging {
    pub fn new(page: u32, page_size: u32) -> Result<Self, StravaError> {
        if page == 0 {
            return Err(StravaError::InvalidInput("page must be at least 1".into()));
        }
        if page_size == 0 {
            return Err(StravaError::InvalidInput(
                "page size must be at least 1".into(),
            ));
        }
        Ok(Self { page, page_size })
    }

    /// First page of `page_size` items.
    pub fn first(page_size: u32) -> Result<Self, StravaError> {
        Self::new(1, page_size)
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Same page size, next page. `None` past the last representable page.
    pub fn next(&self) -> Option<Self> {
        Some(Self {
            page: self.page.checked_add(1)?,
            page_size: self.page_size,
        })
    }

    /// The API-sized pages covering an oversize request, produced lazily.
    ///
    /// The request covers items `[(page-1)*size, page*size)`. They are read
    /// from consecutive pages of `MAX_PAGE_SIZE`, keeping only the items
    /// inside that window. A window reaching past API page `u32::MAX` yields
    /// `InvalidInput` at that point.
    fn api_pages(self) -> impl Iterator<Item = Result<ApiPage, StravaError>> {
        let max = u64::from(MAX_PAGE_SIZE);
        let start = u64::from(self.page - 1) * u64::from(self.page_size);
        let end = start + u64::from(self.page_size);
        let first = start / max + 1;
        let last = (end - 1) / max + 1;
        (first..=last).map(move |api_page| {
            let page = u32::try_from(api_page).map_err(|_| {
                StravaError::InvalidInput(format!(
                    "page {} of size {} lies beyond the last API page",
                    self.page, self.page_size
                ))
            })?;
            let page_start = (api_page - 1) * max;
            let page_end = page_start + max;
            let from = start.max(page_start);
            let to = end.min(page_end);
            Ok(ApiPage {
                paging: Paging {
                    page,
                    page_size: MAX_PAGE_SIZE,
                },
                skip: (from - page_start) as usize,
                take: (to - from) as usize,
            })
        })
    }
}

/// One request to the API and the slice of its result the caller asked for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct ApiPage {
    paging: Paging,
    skip: usize,
    take: usize,
}

/// Run a paged list request.
///
/// With an instruction, returns exactly that page; without one, returns every
/// record by walking pages of [`MAX_PAGE_SIZE`] until a short page comes back.
/// Fetch failures are returned as they are.
pub async fn handle_paging<T, F, Fut>(
    paging: Option<Paging>,
    fetch: F,
) -> Result<Vec<T>, StravaError>
where
    F: FnMut(Paging) -> Fut,
    Fut: Future<Output = Result<Vec<T>, StravaError>>,
{
    match paging {
        Some(paging) => fetch_page(paging, fetch).await,
        None => fetch_all(fetch).await,
    }
}

async fn fetch_page<T, F, Fut>(paging: Paging, mut fetch: F) -> Result<Vec<T>, StravaError>
where
    F: FnMut(Paging) -> Fut,
    Fut: Future<Output = Result<Vec<T>, StravaError>>,
{
    if paging.page_size <= MAX_PAGE_SIZE {
        return fetch(paging).await;
    }

    let mut records = Vec::new();
    for api_page in paging.api_pages() {
        let api_page = api_page?;
        let items = fetch(api_page.paging).await?;
        let short = items.len() < api_page.paging.page_size() as usize;
        tracing::trace!(
            page = api_page.paging.page(),
            received = items.len(),
            "fetched page"
        );
        records.extend(items.into_iter().skip(api_page.skip).take(api_page.take));
        if short {
            break;
        }
    }
    Ok(records)
}

async fn fetch_all<T, F, Fut>(fetch: F) -> Result<Vec<T>, StravaError>
where
    F: FnMut(Paging) -> Fut,
    Fut: Future<Output = Result<Vec<T>, StravaError>>,
{
    page_stream(MAX_PAGE_SIZE, fetch).try_concat().await
}

/// Lazily walk pages 1, 2, ... of `page_size` items.
///
/// Requests are capped at [`MAX_PAGE_SIZE`], since Strava never returns more.
/// The stream ends after the first page holding fewer items than requested,
/// or after the first error. A `page_size` of 0 yields a single
/// `InvalidInput` error.
pub fn page_stream<T, F, Fut>(
    page_size: u32,
    fetch: F,
) -> impl Stream<Item = Result<Vec<T>, StravaError>>
where
    F: FnMut(Paging) -> Fut,
    Fut: Future<Output = Result<Vec<T>, StravaError>>,
{
    if page_size > MAX_PAGE_SIZE {
        tracing::debug!(page_size, max = MAX_PAGE_SIZE, "capping page size");
    }
    let start = Some(Paging::first(page_size.min(MAX_PAGE_SIZE)));
    stream::try_unfold((fetch, start), |(mut fetch, next)| async move {
        let Some(paging) = next.transpose()? else {
            return Ok(None);
        };
        let items = fetch(paging).await?;
        tracing::trace!(page = paging.page(), received = items.len(), "fetched page");
        let next = if items.len() < paging.page_size() as usize {
            None
        } else {
            Some(paging.next().ok_or_else(|| {
                StravaError::InvalidInput("page number overflow".into())
            }))
        };
        Ok::<_, StravaError>(Some((items, (fetch, next))))
    })
}
