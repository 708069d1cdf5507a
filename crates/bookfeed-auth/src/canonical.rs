//! Canonical query string construction.
//!
//! The signature covers the query string byte for byte, so the serialization
//! here must be deterministic:
//!
//! ```text
//! key1=value1&key2=value2&...
//! ```
//!
//! Keys are sorted lexicographically (byte order), and both keys and values are
//! percent-encoded with the RFC 3986 unreserved set left intact.

use bookfeed_core::RequestParams;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// The set of characters that must be percent-encoded.
///
/// All characters except unreserved characters (A-Z, a-z, 0-9, `-`, `_`, `.`,
/// `~`) are encoded. In particular space becomes `%20` (never `+`) and `*`
/// becomes `%2A`.
const RFC3986_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode a single key or value.
///
/// # Examples
///
/// ```
/// use bookfeed_auth::canonical::rfc3986_encode;
///
/// assert_eq!(rfc3986_encode("a b*c~d"), "a%20b%2Ac~d");
/// assert_eq!(rfc3986_encode("2009-01-01T12:00:00Z"), "2009-01-01T12%3A00%3A00Z");
/// ```
#[must_use]
pub fn rfc3986_encode(input: &str) -> String {
    utf8_percent_encode(input, RFC3986_ENCODE_SET).to_string()
}

/// Build the canonical query string for a parameter map.
///
/// # Examples
///
/// ```
/// use bookfeed_auth::canonical::build_canonical_query_string;
/// use bookfeed_core::RequestParams;
///
/// let params = RequestParams::new().with("b", "2").with("a", "x y");
/// assert_eq!(build_canonical_query_string(&params), "a=x%20y&b=2");
/// ```
#[must_use]
pub fn build_canonical_query_string(params: &RequestParams) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", rfc3986_encode(k), rfc3986_encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Build the string to sign.
///
/// ```text
/// HTTPMethod\n
/// Host\n
/// RequestURI\n
/// CanonicalQueryString
/// ```
///
/// # Examples
///
/// ```
/// use bookfeed_auth::canonical::build_string_to_sign;
///
/// let sts = build_string_to_sign("GET", "ecs.amazonaws.com", "/onca/xml", "a=1");
/// assert_eq!(sts, "GET\necs.amazonaws.com\n/onca/xml\na=1");
/// ```
#[must_use]
pub fn build_string_to_sign(
    method: &str,
    host: &str,
    request_uri: &str,
    canonical_query: &str,
) -> String {
    format!("{method}\n{host}\n{request_uri}\n{canonical_query}")
}
