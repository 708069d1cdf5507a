//! Query-string request signing.
//!
//! Every request carries the access key and a UTC timestamp as ordinary
//! parameters, and a `Signature` parameter computed as:
//!
//! ```text
//! Signature = Base64(HMAC-SHA256(SecretKey, StringToSign))
//!
//! StringToSign = "GET" + "\n" +
//!                Host + "\n" +
//!                "/onca/xml" + "\n" +
//!                CanonicalQueryString
//! ```
//!
//! A signature is bound to its timestamp; each request is signed afresh.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use bookfeed_core::RequestParams;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::debug;

use crate::canonical::{build_canonical_query_string, build_string_to_sign, rfc3986_encode};

type HmacSha256 = Hmac<Sha256>;

/// The HTTP method every signed request uses.
pub const REQUEST_METHOD: &str = "GET";

/// The request path on every regional host.
pub const REQUEST_URI: &str = "/onca/xml";

/// `strftime` layout of the `Timestamp` parameter.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Parameter carrying the access key id.
pub const ACCESS_KEY_PARAM: &str = "AWSAccessKeyId";

/// Parameter carrying the signing time.
pub const TIMESTAMP_PARAM: &str = "Timestamp";

/// Parameter carrying the signature.
pub const SIGNATURE_PARAM: &str = "Signature";

/// A fully signed, single-use request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    /// The complete request URL, signature included.
    pub url: String,
    /// The canonical query string the signature covers.
    pub canonical_query: String,
    /// The `Timestamp` value that was signed.
    pub timestamp: String,
    /// The base64 signature (before percent-encoding).
    pub signature: String,
}

/// Signs requests for one host with one credential pair.
#[derive(Clone)]
pub struct RequestSigner {
    access_key: String,
    secret_key: String,
    scheme: String,
    host: String,
}

impl fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestSigner")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("scheme", &self.scheme)
            .field("host", &self.host)
            .finish()
    }
}

impl RequestSigner {
    /// Create a signer for `host`, producing `http://` URLs.
    pub fn new(
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
        host: impl Into<String>,
    ) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            scheme: "http".to_owned(),
            host: host.into(),
        }
    }

    /// Use a different URL scheme (e.g. `https`).
    #[must_use]
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// The host the signature is bound to.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The access key id inserted into every request.
    #[must_use]
    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    /// Sign `params` with the current time.
    ///
    /// Inserts `AWSAccessKeyId` and `Timestamp` into `params`.
    pub fn sign(&self, params: &mut RequestParams) -> SignedRequest {
        self.sign_at(params, Utc::now())
    }

    /// Sign `params` as of `now`.
    ///
    /// Inserts `AWSAccessKeyId` and `Timestamp` into `params`, replacing any
    /// previous values.
    pub fn sign_at(&self, params: &mut RequestParams, now: DateTime<Utc>) -> SignedRequest {
        let timestamp = now.format(TIMESTAMP_FORMAT).to_string();
        params.insert(ACCESS_KEY_PARAM, &self.access_key);
        params.insert(TIMESTAMP_PARAM, &timestamp);
        params.remove(SIGNATURE_PARAM);

        let canonical_query = build_canonical_query_string(params);
        let string_to_sign =
            build_string_to_sign(REQUEST_METHOD, &self.host, REQUEST_URI, &canonical_query);

        debug!(string_to_sign = ?string_to_sign, "built string to sign");

        let signature = compute_signature(&self.secret_key, &string_to_sign);
        let url = format!(
            "{}://{}{REQUEST_URI}?{canonical_query}&{SIGNATURE_PARAM}={}",
            self.scheme,
            self.host,
            rfc3986_encode(&signature),
        );

        SignedRequest {
            url,
            canonical_query,
            timestamp,
            signature,
        }
    }
}

/// Compute `Base64(HMAC-SHA256(secret_key, string_to_sign))`.
#[must_use]
pub fn compute_signature(secret_key: &str, string_to_sign: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret_key.as_bytes()).expect("HMAC can accept any key length");
    mac.update(string_to_sign.as_bytes());
    BASE64.encode(mac.finalize().into_bytes())
}
