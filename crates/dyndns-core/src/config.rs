//! Configuration types for the dynamic DNS service
//!
//! The service is configured by a single JSON document keyed by hostname:
//!
//! ```json
//! {
//!   "host.domain.com": {
//!     "aws_region": "eu-central-1",
//!     "route_53_zone_id": "Z1234567890",
//!     "route_53_record_type": "A",
//!     "route_53_record_ttl": 60,
//!     "shared_secret": "1234567890"
//!   }
//! }
//! ```
//!
//! Attributes are resolved lazily through [`ConfigDocument::lookup`], so a
//! hostname with an incomplete entry only fails when the missing attribute
//! is actually needed.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

use crate::error::{Error, Result};

/// Per-hostname configuration attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigAttribute {
    /// Region of the DNS provider API
    Region,
    /// Hosted zone holding the record
    ZoneId,
    /// Record type (A, AAAA)
    RecordType,
    /// Record TTL in seconds
    RecordTtl,
    /// Secret shared with the legitimate client
    SharedSecret,
}

impl ConfigAttribute {
    /// All attributes a complete hostname entry carries
    pub const ALL: [ConfigAttribute; 5] = [
        ConfigAttribute::Region,
        ConfigAttribute::ZoneId,
        ConfigAttribute::RecordType,
        ConfigAttribute::RecordTtl,
        ConfigAttribute::SharedSecret,
    ];

    /// Document key for this attribute
    pub fn key(&self) -> &'static str {
        match self {
            ConfigAttribute::Region => "aws_region",
            ConfigAttribute::ZoneId => "route_53_zone_id",
            ConfigAttribute::RecordType => "route_53_record_type",
            ConfigAttribute::RecordTtl => "route_53_record_ttl",
            ConfigAttribute::SharedSecret => "shared_secret",
        }
    }

    /// Keys accepted for this attribute, preferred key first
    fn accepted_keys(&self) -> &'static [&'static str] {
        match self {
            ConfigAttribute::Region => &["aws_region", "route_53_region"],
            ConfigAttribute::ZoneId => &["route_53_zone_id"],
            ConfigAttribute::RecordType => &["route_53_record_type"],
            ConfigAttribute::RecordTtl => &["route_53_record_ttl"],
            ConfigAttribute::SharedSecret => &["shared_secret"],
        }
    }
}

impl fmt::Display for ConfigAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Resolved configuration of one managed hostname
///
/// Immutable once built. The `Debug` implementation does not expose the
/// shared secret.
#[derive(Clone, PartialEq, Eq)]
pub struct HostnameConfig {
    /// Region of the DNS provider API
    pub region: String,
    /// Hosted zone holding the record
    pub zone_id: String,
    /// Record type (A, AAAA)
    pub record_type: String,
    /// Record TTL in seconds
    pub record_ttl: u32,
    /// Secret shared with the legitimate client
    /// ⚠️ NEVER log this value
    pub shared_secret: String,
}

impl fmt::Debug for HostnameConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostnameConfig")
            .field("region", &self.region)
            .field("zone_id", &self.zone_id)
            .field("record_type", &self.record_type)
            .field("record_ttl", &self.record_ttl)
            .field("shared_secret", &"<REDACTED>")
            .finish()
    }
}

impl HostnameConfig {
    /// Create a hostname configuration
    pub fn new(
        region: impl Into<String>,
        zone_id: impl Into<String>,
        record_type: impl Into<String>,
        record_ttl: u32,
        shared_secret: impl Into<String>,
    ) -> Self {
        Self {
            region: region.into(),
            zone_id: zone_id.into(),
            record_type: record_type.into(),
            record_ttl,
            shared_secret: shared_secret.into(),
        }
    }

    /// Parse a TTL attribute value
    pub fn parse_ttl(hostname: &str, raw: &str) -> Result<u32> {
        raw.trim().parse::<u32>().map_err(|e| {
            Error::config_invalid(hostname, ConfigAttribute::RecordTtl.key(), e.to_string())
        })
    }
}

/// The full configuration document, keyed by hostname
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigDocument {
    hosts: HashMap<String, HashMap<String, Value>>,
}

impl ConfigDocument {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a document from JSON bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Add or replace the entry of a hostname
    pub fn with_host(mut self, hostname: impl Into<String>, config: &HostnameConfig) -> Self {
        let entry = HashMap::from([
            (ConfigAttribute::Region.key().to_string(), Value::from(config.region.clone())),
            (ConfigAttribute::ZoneId.key().to_string(), Value::from(config.zone_id.clone())),
            (
                ConfigAttribute::RecordType.key().to_string(),
                Value::from(config.record_type.clone()),
            ),
            (ConfigAttribute::RecordTtl.key().to_string(), Value::from(config.record_ttl)),
            (
                ConfigAttribute::SharedSecret.key().to_string(),
                Value::from(config.shared_secret.clone()),
            ),
        ]);
        self.hosts.insert(hostname.into(), entry);
        self
    }

    /// Set a single raw attribute of a hostname
    pub fn set_attribute(
        &mut self,
        hostname: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) {
        self.hosts
            .entry(hostname.into())
            .or_default()
            .insert(key.into(), value.into());
    }

    /// Number of configured hostnames
    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    /// Whether the document configures no hostname at all
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// Look up one attribute of a hostname
    ///
    /// Hostname keys match exactly (case-sensitive). Numeric values are
    /// rendered in decimal; any other non-string value is rejected.
    pub fn lookup(&self, hostname: &str, attribute: ConfigAttribute) -> Result<String> {
        let entry = self
            .hosts
            .get(hostname)
            .ok_or_else(|| Error::config_not_found(hostname, attribute.key()))?;

        let value = attribute
            .accepted_keys()
            .iter()
            .find_map(|key| entry.get(*key))
            .filter(|value| !value.is_null())
            .ok_or_else(|| Error::config_not_found(hostname, attribute.key()))?;

        match value {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(Error::config_invalid(
                hostname,
                attribute.key(),
                format!("expected a string or number, got {}", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"{
        "host.domain.com": {
            "route_53_region": "eu-west-1",
            "route_53_zone_id": "Z123",
            "route_53_record_type": "A",
            "route_53_record_ttl": 60,
            "shared_secret": "1234567890"
        },
        "partial.domain.com": {
            "shared_secret": "abc",
            "route_53_record_ttl": ["not", "a", "number"]
        }
    }"#;

    #[test]
    fn test_lookup_reads_strings_and_numbers() {
        let doc = ConfigDocument::from_slice(DOCUMENT.as_bytes()).unwrap();

        assert_eq!(doc.len(), 2);
        assert_eq!(
            doc.lookup("host.domain.com", ConfigAttribute::SharedSecret).unwrap(),
            "1234567890"
        );
        assert_eq!(
            doc.lookup("host.domain.com", ConfigAttribute::RecordTtl).unwrap(),
            "60"
        );
        // Legacy key is accepted for the region
        assert_eq!(
            doc.lookup("host.domain.com", ConfigAttribute::Region).unwrap(),
            "eu-west-1"
        );
    }

    #[test]
    fn test_lookup_missing_hostname_and_attribute() {
        let doc = ConfigDocument::from_slice(DOCUMENT.as_bytes()).unwrap();

        let err = doc
            .lookup("HOST.domain.com", ConfigAttribute::SharedSecret)
            .unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound { ref hostname, .. } if hostname == "HOST.domain.com"));

        let err = doc
            .lookup("partial.domain.com", ConfigAttribute::ZoneId)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::ConfigNotFound { ref attribute, .. } if attribute == "route_53_zone_id"
        ));
    }

    #[test]
    fn test_lookup_rejects_structured_values() {
        let doc = ConfigDocument::from_slice(DOCUMENT.as_bytes()).unwrap();
        let err = doc
            .lookup("partial.domain.com", ConfigAttribute::RecordTtl)
            .unwrap_err();
        assert!(matches!(err, Error::ConfigInvalid { .. }));
    }

    #[test]
    fn test_with_host_round_trips_through_lookup() {
        let config = HostnameConfig::new("us-east-1", "Z1", "AAAA", 300, "s3cret");
        let doc = ConfigDocument::new().with_host("v6.domain.com", &config);

        assert_eq!(doc.lookup("v6.domain.com", ConfigAttribute::RecordType).unwrap(), "AAAA");
        assert_eq!(doc.lookup("v6.domain.com", ConfigAttribute::RecordTtl).unwrap(), "300");
    }

    #[test]
    fn test_parse_ttl() {
        assert_eq!(HostnameConfig::parse_ttl("h", "60").unwrap(), 60);
        assert_eq!(HostnameConfig::parse_ttl("h", " 0 ").unwrap(), 0);
        assert!(HostnameConfig::parse_ttl("h", "-1").is_err());
        assert!(HostnameConfig::parse_ttl("h", "sixty").is_err());
    }

    #[test]
    fn test_shared_secret_not_exposed_in_debug() {
        let config = HostnameConfig::new("r", "z", "A", 60, "secret_value_123");
        let debug_str = format!("{:?}", config);
        assert!(!debug_str.contains("secret_value_123"));
        assert!(debug_str.contains("HostnameConfig"));
    }
}
