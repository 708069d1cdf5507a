//! Paginated `ItemSearch` traversal.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use bookfeed_core::{Locale, RequestParams};
use bookfeed_paapi::{PaapiError, PaapiResult, ProductApi};
use bookfeed_xml::XmlElement;
use futures::stream::{self, Stream, TryStreamExt};
use tracing::{debug, info};

use crate::cache::{PageCache, cache_key};

/// Operation name for paginated searches.
pub const ITEM_SEARCH: &str = "ItemSearch";

const ITEM_PATH: &str = "Items/Item";
const TOTAL_PAGES_PATH: &str = "Items/TotalPages";

/// Drives the product API across result pages.
///
/// Pages are fetched one after another and cached by their full parameter
/// set. Only successful pages are cached.
#[derive(Clone)]
pub struct Aggregator {
    api: Arc<dyn ProductApi>,
    cache: Arc<dyn PageCache>,
    cache_ttl: Duration,
}

impl fmt::Debug for Aggregator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Aggregator")
            .field("cache_ttl", &self.cache_ttl)
            .finish_non_exhaustive()
    }
}

/// Where a traversal stands: the parameters of the next page to fetch.
#[derive(Debug)]
struct PageCursor {
    params: RequestParams,
    page: u32,
}

impl Aggregator {
    /// Create an aggregator over `api`, caching pages in `cache` for
    /// `cache_ttl`.
    pub fn new(api: Arc<dyn ProductApi>, cache: Arc<dyn PageCache>, cache_ttl: Duration) -> Self {
        Self {
            api,
            cache,
            cache_ttl,
        }
    }

    /// Every `Items/Item` element of an `ItemSearch`, page by page.
    ///
    /// `Operation` and `ItemPage` are set on `params`. The stream is lazy: a
    /// page is requested only when the items before it have been consumed.
    /// A no-match response ends the stream without an error; any other error
    /// is yielded once and ends it.
    pub fn item_search(
        &self,
        locale: Locale,
        params: RequestParams,
    ) -> impl Stream<Item = PaapiResult<XmlElement>> + Send + '_ {
        let params = params.with("Operation", ITEM_SEARCH);
        let start = Some(PageCursor { params, page: 1 });

        stream::try_unfold(start, move |cursor| async move {
            match cursor {
                Some(cursor) => self.next_page(locale, cursor).await,
                None => Ok(None),
            }
        })
        .map_ok(|items| stream::iter(items.into_iter().map(Ok::<_, PaapiError>)))
        .try_flatten()
    }

    async fn next_page(
        &self,
        locale: Locale,
        mut cursor: PageCursor,
    ) -> PaapiResult<Option<(Vec<XmlElement>, Option<PageCursor>)>> {
        cursor.params.insert("ItemPage", cursor.page);

        let Some(root) = self.fetch_page(locale, &cursor.params).await? else {
            return Ok(None);
        };

        let total = total_pages(&root)?;
        let items: Vec<XmlElement> = root.find_all(ITEM_PATH).into_iter().cloned().collect();
        info!(
            %locale,
            page = cursor.page,
            total_pages = total,
            items = items.len(),
            "fetched result page"
        );

        let next = (cursor.page < total).then(|| PageCursor {
            params: cursor.params,
            page: cursor.page + 1,
        });
        Ok(Some((items, next)))
    }

    /// Fetch one page through the cache.
    ///
    /// Returns `Ok(None)` when the service reports no exact matches.
    pub async fn fetch_page(
        &self,
        locale: Locale,
        params: &RequestParams,
    ) -> PaapiResult<Option<Arc<XmlElement>>> {
        let operation = params.get("Operation").unwrap_or(ITEM_SEARCH);
        let key = cache_key(operation, locale, params);

        if let Some(page) = self.cache.get(&key) {
            debug!(%key, "page cache hit");
            return Ok(Some(page));
        }

        match self.api.request(locale, params.clone()).await {
            Ok(root) => Ok(Some(self.cache.insert_if_absent(
                key,
                Arc::new(root),
                self.cache_ttl,
            ))),
            Err(PaapiError::Aws(e)) if e.is_no_exact_matches() => {
                debug!(%locale, "no exact matches");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

/// Read `Items/TotalPages`.
fn total_pages(root: &XmlElement) -> PaapiResult<u32> {
    let raw = root
        .find_text(TOTAL_PAGES_PATH)
        .ok_or_else(|| PaapiError::Structure(format!("missing {TOTAL_PAGES_PATH}")))?;
    raw.parse()
        .map_err(|_| PaapiError::Structure(format!("non-numeric {TOTAL_PAGES_PATH}: {raw:?}")))
}
