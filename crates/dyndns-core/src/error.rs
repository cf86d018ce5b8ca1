//! Error types for the dynamic DNS service
//!
//! Every failure the core can produce is a variant of [`Error`]. The
//! `Display` text of each variant is what a client sees in the `FAIL`
//! response body, so messages are written for direct display.

use thiserror::Error;

/// Result type alias for dynamic DNS operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the dynamic DNS service
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or malformed request fields, raised before the core runs
    #[error("{0}")]
    InputValidation(String),

    /// The supplied validation hash is not 64 hexadecimal characters
    #[error("You must pass a valid sha256 hash in the hash= querystring parameter.")]
    InvalidHashFormat,

    /// The supplied validation hash does not match the computed one
    #[error("Validation of hashes failed.")]
    HashMismatch,

    /// Hostname or one of its attributes is absent from the configuration
    #[error("Configuration for hostname '{hostname}' and attribute '{attribute}' not found.")]
    ConfigNotFound {
        /// Hostname that was looked up
        hostname: String,
        /// Attribute that was requested
        attribute: String,
    },

    /// A configuration value exists but cannot be used
    #[error("Configuration for hostname '{hostname}' has an invalid '{attribute}': {reason}")]
    ConfigInvalid {
        /// Hostname that was looked up
        hostname: String,
        /// Attribute holding the bad value
        attribute: String,
        /// Why the value was rejected
        reason: String,
    },

    /// The configuration source could not be read
    #[error("{0}")]
    ConfigLoad(String),

    /// Reading the current DNS record failed
    #[error("{0}")]
    DnsRead(String),

    /// Writing the DNS record failed
    #[error("{0}")]
    DnsWrite(String),

    /// The DNS backend returned more than one value for a single-valued record
    #[error("You should only have a single value for your dynamic record.  You currently have more than one.")]
    MultipleRecordValues,

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an input validation error
    pub fn input(msg: impl Into<String>) -> Self {
        Self::InputValidation(msg.into())
    }

    /// Create a "configuration not found" error
    pub fn config_not_found(hostname: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::ConfigNotFound {
            hostname: hostname.into(),
            attribute: attribute.into(),
        }
    }

    /// Create an invalid configuration value error
    pub fn config_invalid(
        hostname: impl Into<String>,
        attribute: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::ConfigInvalid {
            hostname: hostname.into(),
            attribute: attribute.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration load error
    pub fn config_load(msg: impl Into<String>) -> Self {
        Self::ConfigLoad(msg.into())
    }

    /// Create a DNS read error
    pub fn dns_read(msg: impl Into<String>) -> Self {
        Self::DnsRead(msg.into())
    }

    /// Create a DNS write error
    pub fn dns_write(msg: impl Into<String>) -> Self {
        Self::DnsWrite(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_display_ready() {
        assert_eq!(
            Error::HashMismatch.to_string(),
            "Validation of hashes failed."
        );
        assert_eq!(
            Error::config_not_found("host.domain.com", "shared_secret").to_string(),
            "Configuration for hostname 'host.domain.com' and attribute 'shared_secret' not found."
        );
        assert_eq!(Error::dns_write("Write failed").to_string(), "Write failed");
    }

    #[test]
    fn multiple_values_message_matches_client_text() {
        assert_eq!(
            Error::MultipleRecordValues.to_string(),
            "You should only have a single value for your dynamic record.  \
             You currently have more than one."
        );
    }
}
