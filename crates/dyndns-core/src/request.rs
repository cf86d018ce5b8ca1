//! Inbound update request

use std::fmt;

/// One "update my record" call, as extracted by the handler layer
///
/// Constructed per inbound call and never persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct UpdateRequest {
    /// Hostname whose record should be updated
    pub hostname: String,
    /// Hex-encoded SHA-256 proof supplied by the client
    pub validation_hash: String,
    /// Address the request arrived from
    pub source_ip: String,
    /// Address reported by the client itself; empty when absent
    pub internal_ip: String,
}

impl UpdateRequest {
    /// Create a request without an internal IP
    pub fn new(
        hostname: impl Into<String>,
        validation_hash: impl Into<String>,
        source_ip: impl Into<String>,
    ) -> Self {
        Self {
            hostname: hostname.into(),
            validation_hash: validation_hash.into(),
            source_ip: source_ip.into(),
            internal_ip: String::new(),
        }
    }

    /// Set the internal IP reported by the client
    pub fn with_internal_ip(mut self, internal_ip: impl Into<String>) -> Self {
        self.internal_ip = internal_ip.into();
        self
    }

    /// The IP the record should hold after reconciliation
    pub fn desired_ip(&self) -> &str {
        desired_ip(&self.source_ip, &self.internal_ip)
    }
}

impl fmt::Debug for UpdateRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateRequest")
            .field("hostname", &self.hostname)
            .field("source_ip", &self.source_ip)
            .field("internal_ip", &self.internal_ip)
            .finish_non_exhaustive()
    }
}

/// Internal IP if provided, else source IP
pub fn desired_ip<'a>(source_ip: &'a str, internal_ip: &'a str) -> &'a str {
    if internal_ip.is_empty() {
        source_ip
    } else {
        internal_ip
    }
}
