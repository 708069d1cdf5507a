//! Recent-release book search.

use std::pin::pin;
use std::sync::Arc;

use bookfeed_core::{BookfeedConfig, PubdateAnchor, RequestParams};
use bookfeed_paapi::{PaapiResult, RegionalClients};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use futures::TryStreamExt;
use tracing::{debug, info};

use crate::aggregator::Aggregator;
use crate::cache::InMemoryPageCache;
use crate::error::SearchResult;
use crate::item::CatalogItem;
use crate::query::{SearchQuery, build_power_query};

/// Finds books matching a [`SearchQuery`] released up to a cutoff date.
#[derive(Debug, Clone)]
pub struct BookSearch {
    aggregator: Aggregator,
    anchor: PubdateAnchor,
    associate_tag: Option<String>,
}

impl BookSearch {
    /// Create a search over `aggregator`.
    #[must_use]
    pub fn new(aggregator: Aggregator, anchor: PubdateAnchor) -> Self {
        Self {
            aggregator,
            anchor,
            associate_tag: None,
        }
    }

    /// Send `AssociateTag` with every request.
    #[must_use]
    pub fn with_associate_tag(mut self, tag: Option<String>) -> Self {
        self.associate_tag = tag;
        self
    }

    /// Wire up regional clients and an in-memory page cache from
    /// configuration.
    pub fn from_config(config: &BookfeedConfig) -> PaapiResult<Self> {
        let api = RegionalClients::from_config(config)?;
        let aggregator = Aggregator::new(
            Arc::new(api),
            Arc::new(InMemoryPageCache::new()),
            config.cache_ttl(),
        );
        Ok(Self::new(aggregator, config.pubdate_anchor)
            .with_associate_tag(config.associate_tag.clone()))
    }

    /// Run `query` as of the current time.
    pub async fn search(&self, query: &SearchQuery) -> SearchResult<Vec<CatalogItem>> {
        self.search_at(query, Utc::now()).await
    }

    /// Run `query` as if the current time were `now`.
    ///
    /// "Today" is `now` shifted by the marketplace's UTC offset. Items are
    /// kept when their release date is on or before today plus
    /// [`SearchQuery::days`].
    pub async fn search_at(
        &self,
        query: &SearchQuery,
        now: DateTime<Utc>,
    ) -> SearchResult<Vec<CatalogItem>> {
        let locale = query.locale();
        let local_now = locale.local_now(now);
        let cutoff = cutoff_date(local_now, query.days());
        let power = build_power_query(
            query.keywords(),
            &self.anchor.anchor_month(local_now.date()),
        );

        let mut params = RequestParams::new()
            .with("SearchIndex", "Books")
            .with("Power", &power)
            .with("Sort", "daterank")
            .with("ResponseGroup", "Medium");
        if let Some(tag) = &self.associate_tag {
            params.insert("AssociateTag", tag);
        }

        debug!(%locale, %power, %cutoff, "starting book search");

        let mut items = pin!(self.aggregator.item_search(locale, params));
        let mut found = Vec::new();
        let mut skipped = 0_usize;
        while let Some(element) = items.try_next().await? {
            match CatalogItem::from_element(&element) {
                Some(item) if item.date <= cutoff => found.push(item),
                _ => skipped += 1,
            }
        }

        info!(%locale, found = found.len(), skipped, "book search finished");
        Ok(found)
    }
}

/// Last release date a search accepts: `local_now + days`, as a date.
#[must_use]
pub fn cutoff_date(local_now: NaiveDateTime, days: i64) -> NaiveDate {
    TimeDelta::try_days(days)
        .and_then(|delta| local_now.checked_add_signed(delta))
        .map_or(
            if days < 0 { NaiveDate::MIN } else { NaiveDate::MAX },
            |shifted| shifted.date(),
        )
}
