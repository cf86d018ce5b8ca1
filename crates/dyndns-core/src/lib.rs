// # dyndns-core
//
// Core library for the shared-secret dynamic DNS update service.
//
// ## Architecture Overview
//
// A client reports its address; the service checks a hash derived from a
// per-hostname shared secret and, if it matches, makes the hostname's DNS
// record equal the reported address.
//
// - **ConfigSource**: Trait for per-hostname configuration lookup
// - **DnsBackend**: Trait for reading/writing a single-valued DNS record
// - **RequestAuthenticator**: Validates the client's SHA-256 proof
// - **RecordReconciler**: Read-compare-write over a DnsBackend
// - **RequestProcessor**: Authentication then reconciliation, once per request
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Core logic is separate from cloud backends
// 2. **Injected Backends**: Clients are built once and passed in, never global
// 3. **Errors as Values**: Every step returns `Result`; nothing is retried
// 4. **Idempotency**: A record is only written when its value differs

pub mod auth;
pub mod config;
pub mod error;
pub mod processor;
pub mod reconciler;
pub mod request;
pub mod response;
pub mod source;
pub mod traits;

// Re-export core types for convenience
pub use auth::RequestAuthenticator;
pub use config::{ConfigAttribute, ConfigDocument, HostnameConfig};
pub use error::{Error, Result};
pub use processor::RequestProcessor;
pub use reconciler::{ReconcileOutcome, RecordReconciler};
pub use request::UpdateRequest;
pub use response::{FunctionResponse, ResponseFormat, Status};
pub use source::{FileConfigSource, MemoryConfigSource, MemoryDnsBackend};
pub use traits::{ConfigSource, DnsBackend};
