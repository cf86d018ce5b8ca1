//! Record reconciliation
//!
//! Makes a hostname's single DNS value equal the caller's desired IP:
//!
//! 1. Pick the desired IP (internal IP if present, else source IP)
//! 2. Read the current value (always, and first)
//! 3. If it already matches, stop
//! 4. Otherwise write once and report the before/after values
//!
//! Errors from the backend propagate unchanged and nothing is retried.

use std::fmt;
use tracing::{debug, info};

use crate::error::Result;
use crate::request::desired_ip;
use crate::traits::DnsBackend;

/// What a reconciliation did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Record already held the desired value (no write)
    Unchanged {
        /// Hostname that was checked
        hostname: String,
        /// The current value
        current_ip: String,
    },
    /// Record was written
    Updated {
        /// Hostname that was updated
        hostname: String,
        /// Value before the write; empty if no record existed
        previous_ip: String,
        /// Value confirmed by the backend
        new_ip: String,
    },
}

impl ReconcileOutcome {
    /// Whether a write was performed
    pub fn is_update(&self) -> bool {
        matches!(self, ReconcileOutcome::Updated { .. })
    }

    /// Human-readable message for the client
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ReconcileOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconcileOutcome::Unchanged {
                hostname,
                current_ip,
            } => write!(
                f,
                "Your IP '{}' address matches the current DNS record for '{}'.",
                current_ip, hostname
            ),
            ReconcileOutcome::Updated {
                hostname,
                previous_ip,
                new_ip,
            } => write!(
                f,
                "Your hostname record '{}' has been updated from '{}' to '{}'.",
                hostname, previous_ip, new_ip
            ),
        }
    }
}

/// Read-compare-write over a [`DnsBackend`]
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordReconciler;

impl RecordReconciler {
    /// Create a reconciler
    pub fn new() -> Self {
        Self
    }

    /// Reconcile the record of `hostname` with the caller's address
    ///
    /// Performs exactly one read and at most one write.
    pub async fn reconcile(
        &self,
        hostname: &str,
        source_ip: &str,
        internal_ip: &str,
        dns: &dyn DnsBackend,
    ) -> Result<ReconcileOutcome> {
        let desired = desired_ip(source_ip, internal_ip);

        let current = dns.read(hostname).await?;
        debug!(
            "Current {} record for {}: '{}' (desired '{}')",
            dns.backend_name(),
            hostname,
            current,
            desired
        );

        if current == desired {
            return Ok(ReconcileOutcome::Unchanged {
                hostname: hostname.to_string(),
                current_ip: current,
            });
        }

        let confirmed = dns.update(hostname, desired).await?;
        info!(
            "DNS record updated: {} '{}' -> '{}'",
            hostname, current, confirmed
        );

        Ok(ReconcileOutcome::Updated {
            hostname: hostname.to_string(),
            previous_ip: current,
            new_ip: confirmed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_messages() {
        let unchanged = ReconcileOutcome::Unchanged {
            hostname: "host.domain.com".to_string(),
            current_ip: "1.1.1.1".to_string(),
        };
        assert_eq!(
            unchanged.message(),
            "Your IP '1.1.1.1' address matches the current DNS record for 'host.domain.com'."
        );
        assert!(!unchanged.is_update());

        let updated = ReconcileOutcome::Updated {
            hostname: "host.domain.com".to_string(),
            previous_ip: "2.2.2.2".to_string(),
            new_ip: "1.1.1.1".to_string(),
        };
        assert_eq!(
            updated.message(),
            "Your hostname record 'host.domain.com' has been updated from '2.2.2.2' to '1.1.1.1'."
        );
        assert!(updated.is_update());
    }
}
