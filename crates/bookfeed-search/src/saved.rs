//! Password-protected saved queries.
//!
//! A saved query is created with a password. Anyone may read it, but
//! replacing it requires the same password again. Only the salted hash is
//! stored.

use bookfeed_auth::ssha;
use bookfeed_core::Locale;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{SearchError, SearchResult};
use crate::query::{SearchQuery, parse_keywords};

/// A stored search definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedQuery {
    /// Unique name; the storage key.
    pub name: String,
    /// Feed title.
    pub title: String,
    /// Target marketplace.
    pub locale: Locale,
    /// Day offset of the release-date cutoff.
    pub days: i64,
    /// Keyword text, one phrase per line.
    pub keywords: String,
    /// SSHA hash of the edit password.
    pub password_hash: String,
}

impl SavedQuery {
    /// Create a saved query, hashing `password` with a fresh salt.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        locale: Locale,
        days: i64,
        keywords: impl Into<String>,
        password: &str,
    ) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            locale,
            days,
            keywords: keywords.into(),
            password_hash: ssha::hash(password, None),
        }
    }

    /// Check `candidate` against the stored hash.
    pub fn verify_password(&self, candidate: &str) -> SearchResult<bool> {
        Ok(ssha::verify(&self.password_hash, candidate)?)
    }

    /// The search this saved query describes.
    pub fn to_search_query(&self) -> SearchResult<SearchQuery> {
        SearchQuery::from_keywords(parse_keywords(&self.keywords), self.locale, self.days)
    }
}

/// Storage for saved queries, keyed by name.
pub trait SavedQueryStore: Send + Sync {
    /// The saved query called `name`.
    fn get(&self, name: &str) -> Option<SavedQuery>;

    /// Insert or replace `query`.
    fn put(&self, query: SavedQuery);

    /// Store `query` unless its name is taken; returns the existing entry
    /// otherwise. The check and the insert are one atomic step.
    fn insert_if_absent(&self, query: SavedQuery) -> Option<SavedQuery>;
}

/// Process-local [`SavedQueryStore`].
#[derive(Debug, Default)]
pub struct InMemorySavedQueryStore {
    queries: DashMap<String, SavedQuery>,
}

impl InMemorySavedQueryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of saved queries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queries.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }
}

impl SavedQueryStore for InMemorySavedQueryStore {
    fn get(&self, name: &str) -> Option<SavedQuery> {
        self.queries.get(name).map(|q| q.clone())
    }

    fn put(&self, query: SavedQuery) {
        self.queries.insert(query.name.clone(), query);
    }

    fn insert_if_absent(&self, query: SavedQuery) -> Option<SavedQuery> {
        match self.queries.entry(query.name.clone()) {
            Entry::Occupied(existing) => Some(existing.get().clone()),
            Entry::Vacant(slot) => {
                slot.insert(query);
                None
            }
        }
    }
}

/// Create or update a saved query.
///
/// A new name is stored as given. An existing one is replaced only when
/// `password` verifies against the stored hash; the stored hash is kept so
/// the edit password never changes through an update. A create that loses
/// a race for the same name is checked against the winner's password.
///
/// # Errors
///
/// - [`SearchError::EmptyKeywords`] when the keyword text has no phrase.
/// - [`SearchError::PasswordMismatch`] when updating with a wrong password.
/// - [`SearchError::HashFormat`] when the stored hash is corrupt.
pub fn save_query(
    store: &dyn SavedQueryStore,
    mut draft: SavedQuery,
    password: &str,
) -> SearchResult<SavedQuery> {
    draft.to_search_query()?;

    let existing = match store.get(&draft.name) {
        Some(existing) => existing,
        None => match store.insert_if_absent(draft.clone()) {
            None => {
                info!(name = %draft.name, "created saved query");
                return Ok(draft);
            }
            Some(existing) => existing,
        },
    };

    if !existing.verify_password(password)? {
        warn!(name = %draft.name, "rejected saved query update");
        return Err(SearchError::PasswordMismatch(draft.name));
    }
    draft.password_hash = existing.password_hash;
    info!(name = %draft.name, "updated saved query");

    store.put(draft.clone());
    Ok(draft)
}
