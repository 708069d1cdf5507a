//! Product advertising API error types.
//!
//! The service reports failures inside an otherwise ordinary XML response, as
//! an `<Error>` element holding a `<Code>` and a `<Message>`. Those become
//! [`ServiceError`]; transport, decoding and configuration failures get their
//! own [`PaapiError`] variants.

use std::fmt;

use bookfeed_core::BookfeedError;
use bookfeed_xml::XmlError;

/// An error reported by the remote service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceError {
    /// The service error code (e.g. `AWS.ECommerceService.NoExactMatches`).
    pub code: String,
    /// Human-readable message from the service.
    pub message: String,
}

impl ServiceError {
    /// Code returned when a search matched nothing.
    pub const NO_EXACT_MATCHES: &str = "AWS.ECommerceService.NoExactMatches";

    /// Create a service error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Whether this error only means "no results".
    #[must_use]
    pub fn is_no_exact_matches(&self) -> bool {
        self.code == Self::NO_EXACT_MATCHES
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// Errors produced by the signed API client.
#[derive(Debug, thiserror::Error)]
pub enum PaapiError {
    /// The client could not be configured (unsupported locale, bad endpoint).
    #[error("configuration error: {0}")]
    Configuration(#[from] BookfeedError),

    /// The service returned a structured error.
    #[error("service error: {0}")]
    Aws(ServiceError),

    /// The HTTP exchange failed or timed out.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The service answered with a non-success status and no error document.
    #[error("unexpected HTTP status {status} from {host}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Host that answered.
        host: String,
    },

    /// The body was not XML.
    #[error("malformed response: {0}")]
    Parse(#[from] XmlError),

    /// The body was XML but lacked the expected structure.
    #[error("unexpected response structure: {0}")]
    Structure(String),
}

impl PaapiError {
    /// The service error, if this is one.
    #[must_use]
    pub fn service_error(&self) -> Option<&ServiceError> {
        match self {
            Self::Aws(e) => Some(e),
            _ => None,
        }
    }

    /// Whether this failure happened at the transport level.
    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Status { .. })
    }

    /// Whether this failure is a malformed or unexpected response.
    #[must_use]
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse(_) | Self::Structure(_))
    }
}

impl From<ServiceError> for PaapiError {
    fn from(e: ServiceError) -> Self {
        Self::Aws(e)
    }
}

/// Convenience result type for client operations.
pub type PaapiResult<T> = Result<T, PaapiError>;
