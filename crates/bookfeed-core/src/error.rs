//! Error types for the bookfeed core.

/// Core error type for bookfeed infrastructure.
#[derive(Debug, thiserror::Error)]
pub enum BookfeedError {
    /// The locale code is not one of the supported marketplaces.
    #[error("locale not supported: {0} (expected one of ca, de, fr, jp, uk, us)")]
    InvalidLocale(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal error with context.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Convenience result type for bookfeed core operations.
pub type BookfeedResult<T> = Result<T, BookfeedError>;
