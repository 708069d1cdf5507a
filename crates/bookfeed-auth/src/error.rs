//! Error types for salted hash handling.

/// A stored salted hash could not be interpreted.
#[derive(Debug, thiserror::Error)]
pub enum HashFormatError {
    /// The stored value is not valid base64.
    #[error("salted hash is not valid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    /// The decoded value is too short to contain a digest.
    #[error("salted hash is {len} bytes, shorter than the {digest_len}-byte digest")]
    TooShort {
        /// Decoded length in bytes.
        len: usize,
        /// Required digest length in bytes.
        digest_len: usize,
    },
}
