//! Update request processor
//!
//! The RequestProcessor is responsible for:
//! - Resolving the hostname's configuration
//! - Authenticating the caller against the shared secret
//! - Reconciling the DNS record with the caller's address
//!
//! ## Flow
//!
//! ```text
//! ┌──────────────┐   HostnameConfig   ┌──────────────────────┐
//! │ ConfigSource │───────────────────▶│ RequestAuthenticator │
//! └──────────────┘                    └──────────────────────┘
//!                                                │ ok
//!                                                ▼
//!                    ┌────────────┐     ┌──────────────────┐
//!                    │ DnsBackend │◀────│ RecordReconciler │
//!                    └────────────┘     └──────────────────┘
//! ```
//!
//! Each step runs once; the first error ends the request.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::auth::RequestAuthenticator;
use crate::error::Result;
use crate::reconciler::{ReconcileOutcome, RecordReconciler};
use crate::request::UpdateRequest;
use crate::traits::{ConfigSource, DnsBackend};

/// Orchestrates authentication and reconciliation for one update request
///
/// Backends are constructed once by the caller and injected here; the
/// processor itself holds no per-request state and can be shared across
/// tasks.
pub struct RequestProcessor {
    config: Arc<dyn ConfigSource>,
    dns: Arc<dyn DnsBackend>,
    authenticator: RequestAuthenticator,
    reconciler: RecordReconciler,
}

impl RequestProcessor {
    /// Create a processor over the given configuration source and DNS backend
    pub fn new(config: Arc<dyn ConfigSource>, dns: Arc<dyn DnsBackend>) -> Self {
        Self {
            config,
            dns,
            authenticator: RequestAuthenticator::new(),
            reconciler: RecordReconciler::new(),
        }
    }

    /// The configuration source this processor reads from
    pub fn config_source(&self) -> &Arc<dyn ConfigSource> {
        &self.config
    }

    /// Process one update request
    ///
    /// # Errors
    ///
    /// - `ConfigNotFound` / `ConfigInvalid`: hostname not (fully) configured
    /// - `InvalidHashFormat` / `HashMismatch`: authentication failed; the
    ///   DNS backend is not touched
    /// - `DnsRead` / `DnsWrite` / `MultipleRecordValues`: from reconciliation
    pub async fn process(
        &self,
        hostname: &str,
        validation_hash: &str,
        source_ip: &str,
        internal_ip: &str,
    ) -> Result<ReconcileOutcome> {
        let config = self.config.hostname_config(hostname).await?;
        debug!("Resolved configuration for {}: {:?}", hostname, config);

        if let Err(e) =
            self.authenticator
                .check_hash(hostname, validation_hash, source_ip, &config.shared_secret)
        {
            warn!("Rejected update for {} from {}: {}", hostname, source_ip, e);
            return Err(e);
        }

        self.reconciler
            .reconcile(hostname, source_ip, internal_ip, self.dns.as_ref())
            .await
    }

    /// Process an [`UpdateRequest`]
    pub async fn handle(&self, request: &UpdateRequest) -> Result<ReconcileOutcome> {
        self.process(
            &request.hostname,
            &request.validation_hash,
            &request.source_ip,
            &request.internal_ip,
        )
        .await
    }
}
