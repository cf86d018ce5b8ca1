//! Shared-secret request authentication
//!
//! A client proves it may update a hostname by sending
//! `sha256(source_ip || hostname || shared_secret)` as a hex string. The
//! secret itself never travels; the service recomputes the digest from the
//! address it observed and the secret it holds.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::error::{Error, Result};

/// Length of a hex-encoded SHA-256 digest
const HASH_HEX_LEN: usize = 64;

/// Stateless validator for client-supplied hashes
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestAuthenticator;

impl RequestAuthenticator {
    /// Create an authenticator
    pub fn new() -> Self {
        Self
    }

    /// Check a validation hash against the one computed from the inputs
    ///
    /// The format check runs first, so malformed input is rejected without
    /// touching the secret. The digest comparison ignores the case of the
    /// supplied hash and runs in constant time.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidHashFormat`]: not exactly 64 hexadecimal characters
    /// - [`Error::HashMismatch`]: well-formed but wrong
    pub fn check_hash(
        &self,
        hostname: &str,
        validation_hash: &str,
        source_ip: &str,
        shared_secret: &str,
    ) -> Result<()> {
        if !is_valid_hash_format(validation_hash) {
            return Err(Error::InvalidHashFormat);
        }

        let expected = Self::compute_hash(source_ip, hostname, shared_secret);
        let supplied = validation_hash.to_ascii_lowercase();

        if bool::from(expected.as_bytes().ct_eq(supplied.as_bytes())) {
            Ok(())
        } else {
            Err(Error::HashMismatch)
        }
    }

    /// Compute the lowercase hex digest a legitimate client would send
    pub fn compute_hash(source_ip: &str, hostname: &str, shared_secret: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(source_ip.as_bytes());
        hasher.update(hostname.as_bytes());
        hasher.update(shared_secret.as_bytes());
        hex::encode(hasher.finalize())
    }
}

/// Whether a string is exactly 64 hexadecimal characters (either case)
pub fn is_valid_hash_format(hash: &str) -> bool {
    hash.len() == HASH_HEX_LEN && hash.bytes().all(|b| b.is_ascii_hexdigit())
}
