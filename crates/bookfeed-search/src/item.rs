//! Catalog records extracted from `Items/Item` elements.

use bookfeed_xml::XmlElement;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A book listed by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    /// `ItemAttributes/ISBN`.
    pub isbn: String,
    /// The release date exactly as the service sent it.
    pub release_date: String,
    /// [`release_date`](Self::release_date) parsed; month-only dates become
    /// the first of the month.
    pub date: NaiveDate,
    /// `ItemAttributes/Title`, empty when absent.
    pub title: String,
    /// `ItemAttributes/Author`, in document order.
    pub authors: Vec<String>,
    /// `LargeImage/URL`.
    pub large_image: Option<String>,
    /// `MediumImage/URL`.
    pub medium_image: Option<String>,
    /// `SmallImage/URL`.
    pub small_image: Option<String>,
}

impl CatalogItem {
    /// Build a record from an `Item` element.
    ///
    /// Returns `None` for items without an ISBN or without a parseable
    /// release date. `ReleaseDate` is preferred; `PublicationDate` is used
    /// only when `ReleaseDate` is absent.
    #[must_use]
    pub fn from_element(item: &XmlElement) -> Option<Self> {
        let attrs = item.find("ItemAttributes")?;
        let isbn = attrs.find_text("ISBN")?;
        let release_date = attrs
            .find_text("ReleaseDate")
            .or_else(|| attrs.find_text("PublicationDate"))?;
        let date = parse_release_date(release_date)?;

        Some(Self {
            isbn: isbn.to_owned(),
            release_date: release_date.to_owned(),
            date,
            title: attrs.find_text("Title").unwrap_or_default().to_owned(),
            authors: attrs
                .find_all("Author")
                .into_iter()
                .map(|a| a.text().to_owned())
                .collect(),
            large_image: image_url(item, "LargeImage"),
            medium_image: image_url(item, "MediumImage"),
            small_image: image_url(item, "SmallImage"),
        })
    }

    /// Authors joined with `/` for display.
    #[must_use]
    pub fn author_line(&self) -> String {
        self.authors.join("/")
    }
}

fn image_url(item: &XmlElement, size: &str) -> Option<String> {
    item.find(size)
        .and_then(|image| image.find_text("URL"))
        .map(ToOwned::to_owned)
}

/// Parse `YYYY-MM-DD`, falling back to `YYYY-MM`.
#[must_use]
pub fn parse_release_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d"))
        .ok()
}
