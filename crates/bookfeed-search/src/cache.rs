//! Result page cache.
//!
//! Pages are keyed by operation, locale and the full canonical parameter
//! map, so two requests share an entry only when they would produce the same
//! signed query (minus credentials and timestamp).

use std::sync::Arc;
use std::time::{Duration, Instant};

use bookfeed_auth::canonical::build_canonical_query_string;
use bookfeed_core::{Locale, RequestParams};
use bookfeed_xml::XmlElement;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

/// Upper bound applied to a TTL too large for the clock.
const MAX_TTL: Duration = Duration::from_secs(10 * 365 * 24 * 60 * 60);

/// Storage for fetched result pages.
///
/// Implementations must tolerate concurrent `get` and `insert_if_absent`
/// calls from independent searches.
pub trait PageCache: Send + Sync {
    /// A live entry for `key`, if any.
    fn get(&self, key: &str) -> Option<Arc<XmlElement>>;

    /// Store `value` unless a live entry already exists.
    ///
    /// Returns whichever value is cached afterwards, so the first writer wins
    /// and later callers observe its page.
    fn insert_if_absent(
        &self,
        key: String,
        value: Arc<XmlElement>,
        ttl: Duration,
    ) -> Arc<XmlElement>;
}

#[derive(Debug)]
struct CacheEntry {
    value: Arc<XmlElement>,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Process-local [`PageCache`] backed by a [`DashMap`].
///
/// Expired entries are dropped lazily when looked up or overwritten.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// use bookfeed_search::{InMemoryPageCache, PageCache};
/// use bookfeed_xml::XmlElement;
///
/// let cache = InMemoryPageCache::new();
/// let page = Arc::new(XmlElement::new("ItemSearchResponse"));
/// cache.insert_if_absent("k".to_owned(), page, Duration::from_secs(60));
/// assert!(cache.get("k").is_some());
/// ```
#[derive(Debug, Default)]
pub struct InMemoryPageCache {
    entries: DashMap<String, CacheEntry>,
}

impl InMemoryPageCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, expired ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every expired entry.
    pub fn purge_expired(&self) {
        let now = Instant::now();
        self.entries.retain(|_, entry| entry.is_live(now));
    }
}

impl PageCache for InMemoryPageCache {
    fn get(&self, key: &str) -> Option<Arc<XmlElement>> {
        let now = Instant::now();
        match self.entries.get(key) {
            Some(entry) if entry.is_live(now) => return Some(Arc::clone(&entry.value)),
            Some(_) => {}
            None => return None,
        }
        // The read guard is released above; removing under it would deadlock.
        self.entries.remove_if(key, |_, entry| !entry.is_live(now));
        None
    }

    fn insert_if_absent(
        &self,
        key: String,
        value: Arc<XmlElement>,
        ttl: Duration,
    ) -> Arc<XmlElement> {
        let now = Instant::now();
        let expires_at = now
            .checked_add(ttl)
            .unwrap_or_else(|| now + MAX_TTL);
        let fresh = CacheEntry {
            value: Arc::clone(&value),
            expires_at,
        };

        match self.entries.entry(key) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().is_live(now) {
                    Arc::clone(&occupied.get().value)
                } else {
                    occupied.insert(fresh);
                    value
                }
            }
            Entry::Vacant(vacant) => {
                vacant.insert(fresh);
                value
            }
        }
    }
}

/// Stable cache key for one page request.
#[must_use]
pub fn cache_key(operation: &str, locale: Locale, params: &RequestParams) -> String {
    format!(
        "{operation}:{locale}:{}",
        build_canonical_query_string(params)
    )
}
