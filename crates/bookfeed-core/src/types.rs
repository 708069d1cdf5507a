//! Marketplace locales and the publication-date anchor policy.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeDelta, Utc};

use crate::BookfeedError;

/// A regional marketplace served by the product advertising API.
///
/// Each locale maps to a fixed request host and a fixed UTC offset used to
/// compute "today" from the point of view of that marketplace.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Canada.
    Ca,
    /// Germany.
    De,
    /// France.
    Fr,
    /// Japan.
    Jp,
    /// United Kingdom.
    Uk,
    /// United States.
    Us,
}

impl Locale {
    /// Every supported locale, in code order.
    pub const ALL: [Locale; 6] = [
        Locale::Ca,
        Locale::De,
        Locale::Fr,
        Locale::Jp,
        Locale::Uk,
        Locale::Us,
    ];

    /// The short locale code (`"us"`, `"jp"`, ...).
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ca => "ca",
            Self::De => "de",
            Self::Fr => "fr",
            Self::Jp => "jp",
            Self::Uk => "uk",
            Self::Us => "us",
        }
    }

    /// The request host for this marketplace.
    #[must_use]
    pub fn host(&self) -> &'static str {
        match self {
            Self::Ca => "ecs.amazonaws.ca",
            Self::De => "ecs.amazonaws.de",
            Self::Fr => "ecs.amazonaws.fr",
            Self::Jp => "ecs.amazonaws.jp",
            Self::Uk => "ecs.amazonaws.co.uk",
            Self::Us => "ecs.amazonaws.com",
        }
    }

    /// The fixed offset from UTC used for this marketplace's calendar.
    #[must_use]
    pub fn utc_offset(&self) -> TimeDelta {
        match self {
            Self::Ca => TimeDelta::hours(-3) + TimeDelta::minutes(-30),
            Self::De | Self::Fr => TimeDelta::hours(1),
            Self::Jp => TimeDelta::hours(9),
            Self::Uk => TimeDelta::zero(),
            Self::Us => TimeDelta::hours(-5),
        }
    }

    /// Shift a UTC instant into this marketplace's wall-clock time.
    #[must_use]
    pub fn local_now(&self, utc: DateTime<Utc>) -> NaiveDateTime {
        utc.naive_utc() + self.utc_offset()
    }
}

impl FromStr for Locale {
    type Err = BookfeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|locale| locale.as_str() == s)
            .ok_or_else(|| BookfeedError::InvalidLocale(s.to_owned()))
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Policy for the lower publication-date bound of a search.
///
/// The search expression only asks for titles published after a given month.
/// That month is derived from the marketplace's current date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PubdateAnchor {
    /// A fixed number of days before today.
    DaysBack(u32),
    /// The first day of the previous calendar month.
    PreviousMonthStart,
}

impl PubdateAnchor {
    /// Four months back, expressed in days.
    pub const DEFAULT_DAYS_BACK: u32 = 120;

    /// Compute the anchor date relative to `today`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bookfeed_core::PubdateAnchor;
    /// use chrono::NaiveDate;
    ///
    /// let today = NaiveDate::from_ymd_opt(2009, 5, 20).unwrap();
    /// let anchor = PubdateAnchor::PreviousMonthStart.anchor_date(today);
    /// assert_eq!(anchor, NaiveDate::from_ymd_opt(2009, 4, 1).unwrap());
    /// ```
    #[must_use]
    pub fn anchor_date(&self, today: NaiveDate) -> NaiveDate {
        match self {
            Self::DaysBack(days) => today
                .checked_sub_signed(TimeDelta::days(i64::from(*days)))
                .unwrap_or(NaiveDate::MIN),
            Self::PreviousMonthStart => {
                let month_start = today.with_day(1).unwrap_or(today);
                month_start
                    .pred_opt()
                    .and_then(|last_of_previous| last_of_previous.with_day(1))
                    .unwrap_or(month_start)
            }
        }
    }

    /// Format the anchor month the way the search DSL expects (`MM-YYYY`).
    #[must_use]
    pub fn anchor_month(&self, today: NaiveDate) -> String {
        self.anchor_date(today).format("%m-%Y").to_string()
    }
}

impl Default for PubdateAnchor {
    fn default() -> Self {
        Self::DaysBack(Self::DEFAULT_DAYS_BACK)
    }
}

impl FromStr for PubdateAnchor {
    type Err = BookfeedError;

    /// Parse `days-back`, `days-back:<n>` or `previous-month`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "days-back" => Ok(Self::default()),
            "previous-month" => Ok(Self::PreviousMonthStart),
            other => other
                .strip_prefix("days-back:")
                .and_then(|n| n.parse::<u32>().ok())
                .map(Self::DaysBack)
                .ok_or_else(|| BookfeedError::Config(format!("invalid pubdate anchor: {other}"))),
        }
    }
}
