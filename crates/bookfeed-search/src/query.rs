//! Search queries and the `Power` search expression.

use bookfeed_core::Locale;

use crate::error::{SearchError, SearchResult};

/// A keyword search against one marketplace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    keywords: Vec<String>,
    locale: Locale,
    days: i64,
}

impl SearchQuery {
    /// Parse keyword text (one phrase per line) for the marketplace named by
    /// `locale`.
    ///
    /// `days` shifts the release-date cutoff relative to the marketplace's
    /// today; `0` keeps titles released up to today.
    ///
    /// # Examples
    ///
    /// ```
    /// use bookfeed_search::SearchQuery;
    ///
    /// let query = SearchQuery::new("rust\n\"async\"\n\n", "jp", 7).unwrap();
    /// assert_eq!(query.keywords(), ["rust", "async"]);
    /// assert!(SearchQuery::new(" \n\"\"", "jp", 7).is_err());
    /// ```
    pub fn new(keywords_text: &str, locale: &str, days: i64) -> SearchResult<Self> {
        let locale = locale
            .parse::<Locale>()
            .map_err(|_| SearchError::InvalidLocale(locale.to_owned()))?;
        Self::from_keywords(parse_keywords(keywords_text), locale, days)
    }

    /// Build a query from already normalized keywords.
    pub fn from_keywords(keywords: Vec<String>, locale: Locale, days: i64) -> SearchResult<Self> {
        if keywords.is_empty() {
            return Err(SearchError::EmptyKeywords);
        }
        Ok(Self {
            keywords,
            locale,
            days,
        })
    }

    /// Keyword phrases, never empty.
    #[must_use]
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Target marketplace.
    #[must_use]
    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Day offset of the release-date cutoff.
    #[must_use]
    pub fn days(&self) -> i64 {
        self.days
    }
}

/// Split keyword text into phrases.
///
/// One phrase per line; double quotes are removed, surrounding whitespace is
/// trimmed and blank lines are dropped.
#[must_use]
pub fn parse_keywords(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.replace('"', "").trim().to_owned())
        .filter(|line| !line.is_empty())
        .collect()
}

/// Build the `Power` expression:
/// `pubdate: after MM-YYYY and keywords: "a" or "b"`.
#[must_use]
pub fn build_power_query(keywords: &[String], anchor_month: &str) -> String {
    let quoted: Vec<String> = keywords.iter().map(|k| format!("\"{k}\"")).collect();
    format!(
        "pubdate: after {anchor_month} and keywords: {}",
        quoted.join(" or ")
    )
}
