//! # Route53 DNS backend
//!
//! Reads and upserts the single-valued record behind a dynamic hostname
//! with `ListResourceRecordSets` and `ChangeResourceRecordSets`.
//!
//! Region, zone id, record type and TTL are resolved per hostname from the
//! shared [`ConfigSource`]. One SDK client is built per region and reused.

use async_trait::async_trait;
use aws_config::{Region, SdkConfig};
use aws_sdk_route53::Client;
use aws_sdk_route53::error::{BuildError, DisplayErrorContext};
use aws_sdk_route53::types::{
    Change, ChangeAction, ChangeBatch, ResourceRecord, ResourceRecordSet, RrType,
};
use dyndns_core::{ConfigAttribute, ConfigSource, DnsBackend, Error, HostnameConfig, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

const READ_FAILED: &str = "Retrieval of current ip address failed.";
const WRITE_FAILED: &str = "Update of DNS record failed.";

/// Prefix Route53 puts in front of hosted zone ids in its own responses
const HOSTED_ZONE_PREFIX: &str = "/hostedzone/";

/// Route53-backed [`DnsBackend`]
pub struct Route53Backend {
    sdk_config: SdkConfig,
    config: Arc<dyn ConfigSource>,
    clients: RwLock<HashMap<String, Client>>,
}

impl std::fmt::Debug for Route53Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route53Backend")
            .field("config", &self.config.source_name())
            .finish_non_exhaustive()
    }
}

impl Route53Backend {
    /// Create a new Route53 backend
    ///
    /// # Parameters
    ///
    /// - `sdk_config`: shared SDK configuration carrying the credentials chain
    /// - `config`: source of per-hostname region, zone id, record type and TTL
    pub fn new(sdk_config: &SdkConfig, config: Arc<dyn ConfigSource>) -> Self {
        Self {
            sdk_config: sdk_config.clone(),
            config,
            clients: RwLock::new(HashMap::new()),
        }
    }

    /// Client for `region`, built on first use
    async fn client(&self, region: &str) -> Client {
        if let Some(client) = self.clients.read().await.get(region) {
            return client.clone();
        }

        let mut clients = self.clients.write().await;
        clients
            .entry(region.to_string())
            .or_insert_with(|| {
                tracing::debug!("Creating Route53 client for region {}", region);
                let conf = aws_sdk_route53::config::Builder::from(&self.sdk_config)
                    .region(Region::new(region.to_string()))
                    .build();
                Client::from_conf(conf)
            })
            .clone()
    }
}

#[async_trait]
impl DnsBackend for Route53Backend {
    async fn read(&self, hostname: &str) -> Result<String> {
        let region = self.config.lookup(hostname, ConfigAttribute::Region).await?;
        let zone_id = self.config.lookup(hostname, ConfigAttribute::ZoneId).await?;
        let record_type = self.config.lookup(hostname, ConfigAttribute::RecordType).await?;
        let zone_id = normalize_zone_id(&zone_id);

        tracing::debug!(
            "Listing Route53 record sets for {} (zone: {}, type: {})",
            hostname,
            zone_id,
            record_type
        );

        let output = self
            .client(&region)
            .await
            .list_resource_record_sets()
            .hosted_zone_id(zone_id)
            .start_record_name(hostname)
            .start_record_type(record_type_of(&record_type))
            .max_items(2)
            .send()
            .await
            .map_err(|e| {
                let e = DisplayErrorContext(e);
                tracing::error!("Route53 read for {} failed: {}", hostname, e);
                Error::dns_read(format!("{} {}", READ_FAILED, e))
            })?;

        select_record_value(output.resource_record_sets(), hostname, &record_type)
    }

    async fn update(&self, hostname: &str, ip: &str) -> Result<String> {
        let region = self.config.lookup(hostname, ConfigAttribute::Region).await?;
        let zone_id = self.config.lookup(hostname, ConfigAttribute::ZoneId).await?;
        let record_type = self.config.lookup(hostname, ConfigAttribute::RecordType).await?;
        let raw_ttl = self.config.lookup(hostname, ConfigAttribute::RecordTtl).await?;
        let ttl = HostnameConfig::parse_ttl(hostname, &raw_ttl)?;
        let zone_id = normalize_zone_id(&zone_id);

        tracing::info!(
            "Upserting Route53 record {} -> {} (zone: {}, type: {}, ttl: {})",
            hostname,
            ip,
            zone_id,
            record_type,
            ttl
        );

        let batch = upsert_change_batch(hostname, &record_type, ttl, ip)
            .map_err(|e| Error::dns_write(format!("{} {}", WRITE_FAILED, e)))?;

        self.client(&region)
            .await
            .change_resource_record_sets()
            .hosted_zone_id(zone_id)
            .change_batch(batch)
            .send()
            .await
            .map_err(|e| {
                let e = DisplayErrorContext(e);
                tracing::error!("Route53 update for {} failed: {}", hostname, e);
                Error::dns_write(format!("{} {}", WRITE_FAILED, e))
            })?;

        Ok(ip.to_string())
    }

    fn backend_name(&self) -> &'static str {
        "route53"
    }
}

/// Hosted zone id without the `/hostedzone/` prefix the console and CLI print
pub fn normalize_zone_id(zone_id: &str) -> &str {
    let zone_id = zone_id.trim();
    zone_id
        .strip_prefix(HOSTED_ZONE_PREFIX)
        .or_else(|| zone_id.strip_prefix(&HOSTED_ZONE_PREFIX[1..]))
        .unwrap_or(zone_id)
}

fn record_type_of(record_type: &str) -> RrType {
    RrType::from(record_type.trim().to_ascii_uppercase().as_str())
}

/// DNS names compare case-insensitively, with or without the root dot
fn same_record_name(listed: &str, hostname: &str) -> bool {
    listed
        .trim_end_matches('.')
        .eq_ignore_ascii_case(hostname.trim_end_matches('.'))
}

/// Pick the value of the record set named `hostname` out of a listing
///
/// A set with more than one value is an error; no matching set yields `""`.
pub fn select_record_value(
    record_sets: &[ResourceRecordSet],
    hostname: &str,
    record_type: &str,
) -> Result<String> {
    for record_set in record_sets {
        if !same_record_name(record_set.name(), hostname) {
            continue;
        }
        if !record_set
            .r#type()
            .as_str()
            .eq_ignore_ascii_case(record_type.trim())
        {
            continue;
        }

        match record_set.resource_records() {
            [] => continue,
            [record] => return Ok(record.value().trim().to_string()),
            _ => return Err(Error::MultipleRecordValues),
        }
    }

    Ok(String::new())
}

/// Change batch upserting `hostname` to the single value `value`
pub fn upsert_change_batch(
    hostname: &str,
    record_type: &str,
    ttl: u32,
    value: &str,
) -> std::result::Result<ChangeBatch, BuildError> {
    let record_set = ResourceRecordSet::builder()
        .name(hostname)
        .r#type(record_type_of(record_type))
        .ttl(i64::from(ttl))
        .resource_records(ResourceRecord::builder().value(value).build()?)
        .build()?;

    let change = Change::builder()
        .action(ChangeAction::Upsert)
        .resource_record_set(record_set)
        .build()?;

    ChangeBatch::builder().changes(change).build()
}
