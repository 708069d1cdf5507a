//! Signed request client for one regional marketplace.

use std::time::Duration;

use bookfeed_auth::{RequestSigner, SignedRequest};
use bookfeed_core::{BookfeedConfig, Locale, RequestParams};
use bookfeed_xml::{XmlElement, parse_document};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::endpoint::Endpoint;
use crate::error::{PaapiError, PaapiResult, ServiceError};

/// Name of the service every request addresses.
pub const SERVICE_NAME: &str = "AWSECommerceService";

/// Default HTTP timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Locations where the service reports request errors.
const ERROR_PATHS: [&str; 2] = ["OperationRequest/Errors/Error", "Items/Request/Errors/Error"];

/// Client bound to one credential pair and one marketplace.
///
/// Immutable after construction; clone it freely; the HTTP connection pool
/// is shared between clones.
#[derive(Debug, Clone)]
pub struct PaapiClient {
    signer: RequestSigner,
    locale: Locale,
    http: reqwest::Client,
}

impl PaapiClient {
    /// Create a client for the marketplace named by `locale`.
    ///
    /// # Errors
    ///
    /// Returns [`PaapiError::Configuration`] when `locale` is not one of
    /// `ca`, `de`, `fr`, `jp`, `uk`, `us`, and [`PaapiError::Network`] when
    /// the HTTP client cannot be initialized.
    pub fn new(access_key: &str, secret_key: &str, locale: &str) -> PaapiResult<Self> {
        let locale: Locale = locale.parse()?;
        let http = build_http_client(DEFAULT_TIMEOUT)?;
        Ok(Self::with_http(access_key, secret_key, locale, None, http))
    }

    /// Create a client from configuration.
    pub fn from_config(config: &BookfeedConfig, locale: &str) -> PaapiResult<Self> {
        let locale: Locale = locale.parse()?;
        let endpoint = config
            .endpoint_override
            .as_deref()
            .map(str::parse::<Endpoint>)
            .transpose()?;
        let http = build_http_client(config.timeout())?;
        Ok(Self::with_http(
            &config.access_key,
            &config.secret_key,
            locale,
            endpoint.as_ref(),
            http,
        ))
    }

    /// Create a client sharing an existing HTTP client.
    ///
    /// When `endpoint` is given, requests go there instead of the locale's
    /// host, and are signed for that host.
    #[must_use]
    pub fn with_http(
        access_key: &str,
        secret_key: &str,
        locale: Locale,
        endpoint: Option<&Endpoint>,
        http: reqwest::Client,
    ) -> Self {
        let signer = match endpoint {
            Some(endpoint) => RequestSigner::new(access_key, secret_key, endpoint.host())
                .with_scheme(endpoint.scheme()),
            None => RequestSigner::new(access_key, secret_key, locale.host()),
        };
        Self {
            signer,
            locale,
            http,
        }
    }

    /// The marketplace this client talks to.
    #[must_use]
    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// The host requests are signed for and sent to.
    #[must_use]
    pub fn host(&self) -> &str {
        self.signer.host()
    }

    /// Sign `params` with the current time and return the request URL.
    #[must_use]
    pub fn sign(&self, params: &mut RequestParams) -> String {
        self.signer.sign(params).url
    }

    /// Sign `params` as of `now`.
    #[must_use]
    pub fn sign_at(&self, params: &mut RequestParams, now: DateTime<Utc>) -> SignedRequest {
        self.signer.sign_at(params, now)
    }

    /// Issue one signed GET and return the response root.
    ///
    /// `Service` is set on `params` before signing.
    ///
    /// # Errors
    ///
    /// - [`PaapiError::Aws`] when the response carries a service error.
    /// - [`PaapiError::Network`] on transport failure or timeout.
    /// - [`PaapiError::Status`] on a non-success status without an error
    ///   document.
    /// - [`PaapiError::Parse`] when the body is not XML.
    pub async fn request(&self, mut params: RequestParams) -> PaapiResult<XmlElement> {
        params.insert("Service", SERVICE_NAME);
        let signed = self.signer.sign(&mut params);

        info!(
            locale = %self.locale,
            host = self.signer.host(),
            operation = params.get("Operation").unwrap_or_default(),
            page = params.get("ItemPage").unwrap_or_default(),
            "sending signed request"
        );

        let response = self.http.get(&signed.url).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        debug!(status = status.as_u16(), bytes = body.len(), "received response");

        interpret_response(self.signer.host(), status.as_u16(), &body)
    }
}

/// Build the HTTP client shared by regional clients.
pub(crate) fn build_http_client(timeout: Duration) -> PaapiResult<reqwest::Client> {
    Ok(reqwest::Client::builder().timeout(timeout).build()?)
}

/// Turn a raw response into a document or an error.
///
/// A service error document wins over the HTTP status, so a rejected request
/// surfaces its `Code` even when the status is 4xx.
pub fn interpret_response(host: &str, status: u16, body: &[u8]) -> PaapiResult<XmlElement> {
    let success = (200..300).contains(&status);
    let root = match parse_document(body) {
        Ok(root) => root,
        Err(e) if success => return Err(e.into()),
        Err(e) => {
            debug!(error = %e, "non-success response body is not XML");
            return Err(PaapiError::Status {
                status,
                host: host.to_owned(),
            });
        }
    };

    check_errors(&root)?;

    if success {
        Ok(root)
    } else {
        Err(PaapiError::Status {
            status,
            host: host.to_owned(),
        })
    }
}

/// Fail with the first service error reported in `root`.
pub fn check_errors(root: &XmlElement) -> Result<(), ServiceError> {
    let Some(error) = ERROR_PATHS.iter().find_map(|path| root.find(path)) else {
        return Ok(());
    };
    let error = ServiceError::new(
        error.find_text("Code").unwrap_or_default(),
        error.find_text("Message").unwrap_or_default(),
    );
    if !error.is_no_exact_matches() {
        warn!(code = %error.code, message = %error.message, "service reported an error");
    }
    Err(error)
}
