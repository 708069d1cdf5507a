//! Salted SHA-1 (SSHA) password hashes.
//!
//! The stored form is:
//!
//! ```text
//! Base64(SHA1(password || salt) || salt)
//! ```
//!
//! The digest has a fixed length, so the salt is everything after the first
//! [`DIGEST_LENGTH`] decoded bytes. Verification recovers that salt, hashes
//! the candidate with it, and compares the encoded strings in constant time.
//!
//! Salts are drawn from the thread-local CSPRNG. Hashes written by older
//! deployments used a non-cryptographic generator for the salt; they share the
//! same layout and verify unchanged.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use rand::RngCore;
use sha1::{Digest, Sha1};
use subtle::ConstantTimeEq;

use crate::error::HashFormatError;

/// Length of a freshly generated salt, in bytes.
pub const SALT_LENGTH: usize = 8;

/// Length of a SHA-1 digest, in bytes.
pub const DIGEST_LENGTH: usize = 20;

/// Hash `password`, generating a salt when none is given.
///
/// # Examples
///
/// ```
/// use bookfeed_auth::ssha;
///
/// let stored = ssha::hash("hunter2", None);
/// assert!(ssha::verify(&stored, "hunter2").unwrap());
/// assert!(!ssha::verify(&stored, "hunter3").unwrap());
/// ```
#[must_use]
pub fn hash(password: &str, salt: Option<&[u8]>) -> String {
    match salt {
        Some(salt) => hash_with_salt(password.as_bytes(), salt),
        None => hash_with_salt(password.as_bytes(), &generate_salt()),
    }
}

/// Check `candidate` against a stored hash.
///
/// # Errors
///
/// Returns [`HashFormatError`] if `encoded` is not a well-formed salted hash.
pub fn verify(encoded: &str, candidate: &str) -> Result<bool, HashFormatError> {
    let salt = find_salt(encoded)?;
    let recomputed = hash_with_salt(candidate.as_bytes(), &salt);
    Ok(encoded.trim().as_bytes().ct_eq(recomputed.as_bytes()).into())
}

/// Recover the salt from a stored hash.
///
/// # Errors
///
/// Returns [`HashFormatError`] if `encoded` is not base64 or is shorter than
/// a digest.
pub fn find_salt(encoded: &str) -> Result<Vec<u8>, HashFormatError> {
    let mut decoded = BASE64.decode(encoded.trim())?;
    if decoded.len() < DIGEST_LENGTH {
        return Err(HashFormatError::TooShort {
            len: decoded.len(),
            digest_len: DIGEST_LENGTH,
        });
    }
    Ok(decoded.split_off(DIGEST_LENGTH))
}

/// Draw a fresh salt from the thread-local CSPRNG.
#[must_use]
pub fn generate_salt() -> [u8; SALT_LENGTH] {
    generate_salt_with(&mut rand::rng())
}

/// Draw a salt from a caller-supplied generator.
pub fn generate_salt_with<R: RngCore + ?Sized>(rng: &mut R) -> [u8; SALT_LENGTH] {
    let mut salt = [0u8; SALT_LENGTH];
    rng.fill_bytes(&mut salt);
    salt
}

fn hash_with_salt(password: &[u8], salt: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(password);
    hasher.update(salt);
    let mut salted = hasher.finalize().to_vec();
    salted.extend_from_slice(salt);
    BASE64.encode(salted)
}
