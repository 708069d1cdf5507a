//! Core types, configuration, and tracing setup for bookfeed.
//!
//! This crate provides the foundational building blocks shared by the signing
//! client and the search aggregator: the table of supported marketplace
//! locales, the ordered request parameter map, environment-driven
//! configuration, and the common error type.

mod config;
mod error;
mod params;
mod telemetry;
mod types;

pub use config::BookfeedConfig;
pub use error::{BookfeedError, BookfeedResult};
pub use params::RequestParams;
pub use telemetry::{build_env_filter, init_tracing};
pub use types::{Locale, PubdateAnchor};
