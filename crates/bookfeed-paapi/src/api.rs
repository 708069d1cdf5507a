//! The seam between the search aggregator and the signed client.

use async_trait::async_trait;
use bookfeed_core::{Locale, RequestParams};
use bookfeed_xml::XmlElement;

use crate::error::PaapiResult;

/// Something that can answer a product advertising API request.
///
/// Implemented by [`RegionalClients`](crate::RegionalClients) for real
/// traffic and by test doubles.
#[async_trait]
pub trait ProductApi: Send + Sync {
    /// Issue one request against `locale` and return the response root.
    async fn request(&self, locale: Locale, params: RequestParams) -> PaapiResult<XmlElement>;
}
