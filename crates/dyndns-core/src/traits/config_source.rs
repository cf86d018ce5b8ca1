// # Config Source Trait
//
// Defines the interface for reading per-hostname configuration.
//
// ## Implementations
//
// - In-memory: `source::MemoryConfigSource`
// - JSON file: `source::FileConfigSource`
// - S3 object: `dyndns-provider-aws` crate
//
// ## Usage
//
// ```rust,ignore
// use dyndns_core::{ConfigSource, config::ConfigAttribute};
//
// let source = /* ConfigSource implementation */;
// source.load().await?;
//
// let secret = source.lookup("host.domain.com", ConfigAttribute::SharedSecret).await?;
// let config = source.hostname_config("host.domain.com").await?;
// ```

use async_trait::async_trait;

use crate::config::{ConfigAttribute, HostnameConfig};
use crate::error::Result;

/// Trait for configuration source implementations
///
/// A source is loaded once per request (or once at startup, depending on
/// the caller) and then answers attribute lookups from that snapshot.
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
/// `load` replaces the snapshot atomically; concurrent lookups observe
/// either the old or the new document, never a mix.
#[async_trait]
pub trait ConfigSource: Send + Sync {
    /// Load (or reload) the configuration document
    ///
    /// # Returns
    ///
    /// - `Ok(())`: The snapshot was replaced
    /// - `Err(Error::ConfigLoad)`: The source could not be read or parsed;
    ///   the previous snapshot stays in place
    async fn load(&self) -> Result<()>;

    /// Look up one attribute of a hostname
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: The attribute value
    /// - `Err(Error::ConfigNotFound)`: Hostname or attribute absent
    async fn lookup(&self, hostname: &str, attribute: ConfigAttribute) -> Result<String>;

    /// Resolve every attribute of a hostname into a [`HostnameConfig`]
    ///
    /// Fails on the first missing attribute.
    async fn hostname_config(&self, hostname: &str) -> Result<HostnameConfig> {
        let region = self.lookup(hostname, ConfigAttribute::Region).await?;
        let zone_id = self.lookup(hostname, ConfigAttribute::ZoneId).await?;
        let record_type = self.lookup(hostname, ConfigAttribute::RecordType).await?;
        let ttl = self.lookup(hostname, ConfigAttribute::RecordTtl).await?;
        let shared_secret = self.lookup(hostname, ConfigAttribute::SharedSecret).await?;

        Ok(HostnameConfig {
            region,
            zone_id,
            record_type,
            record_ttl: HostnameConfig::parse_ttl(hostname, &ttl)?,
            shared_secret,
        })
    }

    /// Get the source name (for logging/debugging)
    fn source_name(&self) -> &'static str;
}
