//! Signed product advertising API client for bookfeed.
//!
//! [`PaapiClient`] signs a parameter map for one marketplace, sends it, parses
//! the XML body and turns service error documents into [`PaapiError::Aws`].
//! [`RegionalClients`] holds one client per locale behind the [`ProductApi`]
//! trait, which is what the search aggregator depends on.

pub mod api;
pub mod client;
pub mod endpoint;
pub mod error;
pub mod regional;

pub use api::ProductApi;
pub use client::{PaapiClient, SERVICE_NAME};
pub use endpoint::Endpoint;
pub use error::{PaapiError, PaapiResult, ServiceError};
pub use regional::RegionalClients;
