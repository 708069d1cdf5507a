//! Configuration management for bookfeed.
//!
//! All configuration is driven by environment variables. Every field has a
//! default so a partially configured environment still produces a usable
//! value; missing credentials surface later as signature failures from the
//! remote service.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::types::PubdateAnchor;

/// Global configuration for the search core.
///
/// # Examples
///
/// ```
/// use bookfeed_core::BookfeedConfig;
///
/// let config = BookfeedConfig::builder()
///     .access_key("AKID".to_owned())
///     .secret_key("secret".to_owned())
///     .build();
/// assert_eq!(config.item_search_cache_time, 3600);
/// assert!(config.associate_tag.is_none());
/// ```
#[derive(Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct BookfeedConfig {
    /// Access key id sent as `AWSAccessKeyId`.
    #[builder(default)]
    pub access_key: String,

    /// Secret key used to sign requests. Never serialized.
    #[builder(default)]
    #[serde(skip_serializing, default)]
    pub secret_key: String,

    /// Affiliate tag sent as `AssociateTag`, when the account requires one.
    #[builder(default)]
    pub associate_tag: Option<String>,

    /// Lifetime of a cached result page, in seconds.
    #[builder(default = 3600)]
    pub item_search_cache_time: u64,

    /// Upper bound on a single upstream HTTP exchange, in seconds.
    #[builder(default = 30)]
    pub request_timeout: u64,

    /// How the lower publication-date bound of a search is chosen.
    #[builder(default)]
    pub pubdate_anchor: PubdateAnchor,

    /// Replace the regional host with `scheme://host[:port]`.
    #[builder(default)]
    pub endpoint_override: Option<String>,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("info"))]
    pub log_level: String,
}

impl Default for BookfeedConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl fmt::Debug for BookfeedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BookfeedConfig")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("associate_tag", &self.associate_tag)
            .field("item_search_cache_time", &self.item_search_cache_time)
            .field("request_timeout", &self.request_timeout)
            .field("pubdate_anchor", &self.pubdate_anchor)
            .field("endpoint_override", &self.endpoint_override)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl BookfeedConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `AWS_ACCESS_KEY` | *(empty)* |
    /// | `AWS_SECRET_KEY` | *(empty)* |
    /// | `ASSOCIATE_TAG` | *(unset)* |
    /// | `ITEM_SEARCH_CACHE_TIME` | `3600` |
    /// | `REQUEST_TIMEOUT` | `30` |
    /// | `PUBDATE_ANCHOR` | `days-back` |
    /// | `PAAPI_ENDPOINT` | *(unset)* |
    /// | `LOG_LEVEL` | `info` |
    ///
    /// Unparseable numeric or policy values fall back to their defaults with a
    /// warning.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(v) = lookup("AWS_ACCESS_KEY") {
            config.access_key = v;
        }
        if let Some(v) = lookup("AWS_SECRET_KEY") {
            config.secret_key = v;
        }
        if let Some(v) = lookup("ASSOCIATE_TAG").filter(|v| !v.is_empty()) {
            config.associate_tag = Some(v);
        }
        if let Some(v) = lookup("ITEM_SEARCH_CACHE_TIME") {
            config.item_search_cache_time =
                parse_or_warn("ITEM_SEARCH_CACHE_TIME", &v, config.item_search_cache_time);
        }
        if let Some(v) = lookup("REQUEST_TIMEOUT") {
            config.request_timeout = parse_or_warn("REQUEST_TIMEOUT", &v, config.request_timeout);
        }
        if let Some(v) = lookup("PUBDATE_ANCHOR") {
            config.pubdate_anchor = parse_or_warn("PUBDATE_ANCHOR", &v, config.pubdate_anchor);
        }
        if let Some(v) = lookup("PAAPI_ENDPOINT").filter(|v| !v.is_empty()) {
            config.endpoint_override = Some(v);
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            config.log_level = v;
        }

        config
    }

    /// Page cache lifetime as a [`Duration`].
    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.item_search_cache_time)
    }

    /// HTTP timeout as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

fn parse_or_warn<T: std::str::FromStr>(key: &str, raw: &str, default: T) -> T {
    raw.trim().parse().unwrap_or_else(|_| {
        tracing::warn!(key, value = raw, "ignoring unparseable configuration value");
        default
    })
}
