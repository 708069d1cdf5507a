//! Paginated book search and saved queries for bookfeed.
//!
//! [`Aggregator`] walks every result page of an `ItemSearch` through a
//! [`PageCache`]. [`BookSearch`] turns a [`SearchQuery`] into the search
//! expression, filters the items by release date and returns
//! [`CatalogItem`]s. [`save_query`] guards saved query updates with the
//! password hash from `bookfeed_auth::ssha`.
//!
//! ```no_run
//! use bookfeed_core::BookfeedConfig;
//! use bookfeed_search::{BookSearch, SearchQuery};
//!
//! # tokio_test::block_on(async {
//! let search = BookSearch::from_config(&BookfeedConfig::from_env()).unwrap();
//! let query = SearchQuery::new("rust\nasync", "us", 0).unwrap();
//! for book in search.search(&query).await.unwrap() {
//!     println!("{} {} {}", book.release_date, book.title, book.author_line());
//! }
//! # });
//! ```

pub mod aggregator;
pub mod cache;
pub mod error;
pub mod item;
pub mod query;
pub mod saved;
pub mod search;

pub use aggregator::Aggregator;
pub use cache::{InMemoryPageCache, PageCache, cache_key};
pub use error::{SearchError, SearchResult};
pub use item::CatalogItem;
pub use query::{SearchQuery, build_power_query, parse_keywords};
pub use saved::{InMemorySavedQueryStore, SavedQuery, SavedQueryStore, save_query};
pub use search::BookSearch;
