//! One client per marketplace, sharing a connection pool.

use std::collections::HashMap;

use async_trait::async_trait;
use bookfeed_core::{BookfeedConfig, BookfeedError, Locale, RequestParams};
use bookfeed_xml::XmlElement;
use tracing::info;

use crate::api::ProductApi;
use crate::client::{PaapiClient, build_http_client};
use crate::endpoint::Endpoint;
use crate::error::PaapiResult;

/// Signed clients for every supported locale.
#[derive(Debug, Clone)]
pub struct RegionalClients {
    clients: HashMap<Locale, PaapiClient>,
}

impl RegionalClients {
    /// Build a client for each locale from configuration.
    ///
    /// All clients share one HTTP client with the configured timeout. An
    /// endpoint override sends every locale to the same host.
    pub fn from_config(config: &BookfeedConfig) -> PaapiResult<Self> {
        let endpoint = config
            .endpoint_override
            .as_deref()
            .map(str::parse::<Endpoint>)
            .transpose()?;
        let http = build_http_client(config.timeout())?;

        let clients = Locale::ALL
            .into_iter()
            .map(|locale| {
                let client = PaapiClient::with_http(
                    &config.access_key,
                    &config.secret_key,
                    locale,
                    endpoint.as_ref(),
                    http.clone(),
                );
                (locale, client)
            })
            .collect();

        info!(
            endpoint = ?endpoint.as_ref().map(ToString::to_string),
            timeout_secs = config.request_timeout,
            "regional clients ready"
        );

        Ok(Self { clients })
    }

    /// The client for `locale`.
    pub fn client(&self, locale: Locale) -> PaapiResult<&PaapiClient> {
        self.clients
            .get(&locale)
            .ok_or_else(|| BookfeedError::InvalidLocale(locale.to_string()).into())
    }
}

#[async_trait]
impl ProductApi for RegionalClients {
    async fn request(&self, locale: Locale, params: RequestParams) -> PaapiResult<XmlElement> {
        self.client(locale)?.request(params).await
    }
}
