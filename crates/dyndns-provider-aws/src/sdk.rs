//! Shared AWS SDK configuration
//!
//! Credentials come from the SDK's default provider chain (environment,
//! shared profile, web identity, container and instance metadata), so no
//! secret is ever read or held by this crate directly.

use aws_config::default_provider::credentials::DefaultCredentialsChain;
use aws_config::timeout::TimeoutConfig;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use std::time::Duration;

/// Region used when nothing more specific is configured
pub const DEFAULT_REGION: &str = "us-east-1";

/// Upper bound for one API call, retries included
const API_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound for a single attempt
const API_CALL_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(10);

/// Load the shared SDK configuration for `region`
///
/// Clients derived from it may override the region per service.
pub async fn load_sdk_config(region: &str) -> SdkConfig {
    let credentials_provider = DefaultCredentialsChain::builder()
        .region(Region::new(region.to_owned()))
        .build()
        .await;

    aws_config::defaults(BehaviorVersion::latest())
        .credentials_provider(credentials_provider)
        .region(Region::new(region.to_owned()))
        .timeout_config(
            TimeoutConfig::builder()
                .operation_timeout(API_CALL_TIMEOUT)
                .operation_attempt_timeout(API_CALL_ATTEMPT_TIMEOUT)
                .build(),
        )
        .load()
        .await
}

#[cfg(test)]
pub(crate) fn offline_sdk_config() -> SdkConfig {
    SdkConfig::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new(DEFAULT_REGION))
        .build()
}
