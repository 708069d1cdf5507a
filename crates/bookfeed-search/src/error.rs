//! Search and saved-query error types.

use bookfeed_auth::HashFormatError;
use bookfeed_paapi::PaapiError;

/// Errors produced while searching or saving queries.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The upstream API call failed.
    #[error(transparent)]
    Api(#[from] PaapiError),

    /// A stored password hash could not be decoded.
    #[error("stored password hash is malformed: {0}")]
    HashFormat(#[from] HashFormatError),

    /// The keyword text held no usable phrase.
    #[error("at least one keyword is required")]
    EmptyKeywords,

    /// The locale code is not a supported marketplace.
    #[error("locale not supported: {0}")]
    InvalidLocale(String),

    /// The password did not match the saved query's hash.
    #[error("password does not match saved query {0:?}")]
    PasswordMismatch(String),
}

/// Convenience result type for search operations.
pub type SearchResult<T> = Result<T, SearchError>;
