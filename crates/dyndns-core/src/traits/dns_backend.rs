// # DNS Backend Trait
//
// Defines the interface for reading and writing a hostname's DNS record.
//
// ## Implementations
//
// - In-memory: `source::MemoryDnsBackend`
// - Route53: `dyndns-provider-aws` crate
//
// ## Usage
//
// ```rust,ignore
// use dyndns_core::DnsBackend;
//
// let backend = /* DnsBackend implementation */;
//
// let current = backend.read("host.domain.com").await?;
// if current != "1.2.3.4" {
//     backend.update("host.domain.com", "1.2.3.4").await?;
// }
// ```

use async_trait::async_trait;

use crate::error::Result;

/// Trait for DNS backend implementations
///
/// Managed records are single-valued. Backends report what they find and
/// perform what they are told; deciding whether a write is needed belongs
/// to [`RecordReconciler`](crate::reconciler::RecordReconciler).
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
///
/// ## Forbidden Capabilities
/// - ❌ Retry or back off (errors are surfaced to the caller as-is)
/// - ❌ Decide whether an update is needed
/// - ❌ Pick one value when a record holds several
#[async_trait]
pub trait DnsBackend: Send + Sync {
    /// Read the current value of a hostname's record
    ///
    /// # Returns
    ///
    /// - `Ok(String::new())`: No matching record exists
    /// - `Ok(value)`: Exactly one matching record value
    /// - `Err(Error::MultipleRecordValues)`: The record holds more than one value
    /// - `Err(Error::DnsRead)`: The backend could not be queried
    async fn read(&self, hostname: &str) -> Result<String>;

    /// Set the record of a hostname to a single value
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: The value the backend confirmed writing
    /// - `Err(Error::DnsWrite)`: The write failed
    async fn update(&self, hostname: &str, ip: &str) -> Result<String>;

    /// Get the backend name (for logging/debugging)
    fn backend_name(&self) -> &'static str;
}
