// # Memory Sources
//
// In-memory implementations of ConfigSource and DnsBackend.
//
// ## Purpose
//
// Simple, fast implementations that hold everything in a HashMap behind a
// RwLock. Nothing persists across restarts.
//
// ## When to Use
//
// - Testing environments
// - Embedding the processor without cloud backends
// - Local development of clients (the daemon's `memory` backend)

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::{ConfigAttribute, ConfigDocument};
use crate::error::{Error, Result};
use crate::traits::{ConfigSource, DnsBackend};

/// In-memory configuration source
///
/// `load` is a no-op; the document is supplied at construction time or
/// replaced with [`MemoryConfigSource::replace`].
///
/// # Example
///
/// ```rust,no_run
/// use dyndns_core::config::{ConfigAttribute, ConfigDocument, HostnameConfig};
/// use dyndns_core::source::MemoryConfigSource;
/// use dyndns_core::ConfigSource;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let host = HostnameConfig::new("eu-west-1", "Z123", "A", 60, "1234567890");
///     let source = MemoryConfigSource::new(ConfigDocument::new().with_host("host.domain.com", &host));
///
///     let ttl = source.lookup("host.domain.com", ConfigAttribute::RecordTtl).await?;
///     assert_eq!(ttl, "60");
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigSource {
    inner: Arc<RwLock<ConfigDocument>>,
}

impl MemoryConfigSource {
    /// Create a source serving the given document
    pub fn new(document: ConfigDocument) -> Self {
        Self {
            inner: Arc::new(RwLock::new(document)),
        }
    }

    /// Replace the served document
    pub async fn replace(&self, document: ConfigDocument) {
        *self.inner.write().await = document;
    }
}

#[async_trait]
impl ConfigSource for MemoryConfigSource {
    async fn load(&self) -> Result<()> {
        Ok(())
    }

    async fn lookup(&self, hostname: &str, attribute: ConfigAttribute) -> Result<String> {
        self.inner.read().await.lookup(hostname, attribute)
    }

    fn source_name(&self) -> &'static str {
        "memory"
    }
}

/// In-memory DNS backend
///
/// Each hostname maps to a list of values so that tests can model the
/// "more than one value" integrity violation. `update` always leaves
/// exactly one value.
#[derive(Debug, Clone, Default)]
pub struct MemoryDnsBackend {
    inner: Arc<RwLock<HashMap<String, Vec<String>>>>,
}

impl MemoryDnsBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a hostname's record with the given values
    pub async fn set_values(&self, hostname: impl Into<String>, values: Vec<String>) {
        self.inner.write().await.insert(hostname.into(), values);
    }

    /// Current values of a hostname's record
    pub async fn values(&self, hostname: &str) -> Vec<String> {
        self.inner
            .read()
            .await
            .get(hostname)
            .cloned()
            .unwrap_or_default()
    }

    /// Get the number of records in the backend
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Check if the backend is empty
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[async_trait]
impl DnsBackend for MemoryDnsBackend {
    async fn read(&self, hostname: &str) -> Result<String> {
        let guard = self.inner.read().await;
        match guard.get(hostname).map(Vec::as_slice) {
            None | Some([]) => Ok(String::new()),
            Some([value]) => Ok(value.clone()),
            Some(_) => Err(Error::MultipleRecordValues),
        }
    }

    async fn update(&self, hostname: &str, ip: &str) -> Result<String> {
        let mut guard = self.inner.write().await;
        guard.insert(hostname.to_string(), vec![ip.to_string()]);
        Ok(ip.to_string())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HostnameConfig;

    #[tokio::test]
    async fn test_memory_backend_read_policy() {
        let backend = MemoryDnsBackend::new();

        // Absent record reads as empty
        assert!(backend.is_empty().await);
        assert_eq!(backend.read("example.com").await.unwrap(), "");

        backend
            .set_values("example.com", vec!["1.2.3.4".to_string()])
            .await;
        assert_eq!(backend.read("example.com").await.unwrap(), "1.2.3.4");

        backend
            .set_values(
                "example.com",
                vec!["1.2.3.4".to_string(), "5.6.7.8".to_string()],
            )
            .await;
        assert!(matches!(
            backend.read("example.com").await,
            Err(Error::MultipleRecordValues)
        ));
    }

    #[tokio::test]
    async fn test_memory_backend_update_collapses_values() {
        let backend = MemoryDnsBackend::new();
        backend
            .set_values("example.com", vec!["a".to_string(), "b".to_string()])
            .await;

        let confirmed = backend.update("example.com", "9.9.9.9").await.unwrap();
        assert_eq!(confirmed, "9.9.9.9");
        assert_eq!(backend.values("example.com").await, vec!["9.9.9.9"]);
        assert_eq!(backend.len().await, 1);
    }

    #[tokio::test]
    async fn test_memory_config_replace() {
        let source = MemoryConfigSource::default();
        assert!(source
            .lookup("example.com", ConfigAttribute::SharedSecret)
            .await
            .is_err());

        let host = HostnameConfig::new("r", "z", "A", 60, "secret");
        source
            .replace(ConfigDocument::new().with_host("example.com", &host))
            .await;
        source.load().await.unwrap();

        assert_eq!(source.hostname_config("example.com").await.unwrap(), host);
    }
}
