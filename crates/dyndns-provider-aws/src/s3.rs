// # S3 Config Source
//
// Serves the hostname configuration document from a JSON object in S3.
//
// ## Reload Behavior
//
// - `load` fetches and re-parses the whole object
// - The new document replaces the old one only if parsing succeeds
// - A failed load keeps serving the previous snapshot
//
// ## Environment
//
// The object is located by `CONFIG_S3_REGION`, `CONFIG_S3_BUCKET` and
// `CONFIG_S3_KEY`; all three are required.

use async_trait::async_trait;
use aws_config::{Region, SdkConfig};
use aws_sdk_s3::Client;
use aws_sdk_s3::error::DisplayErrorContext;
use dyndns_core::{ConfigAttribute, ConfigDocument, ConfigSource, Error, Result};
use std::sync::Arc;
use tokio::sync::RwLock;

const MISSING_ENV: &str = "You have to configure the environment variables CONFIG_S3_REGION, CONFIG_S3_BUCKET and CONFIG_S3_KEY.";

/// Where the configuration object lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3Location {
    /// Bucket region
    pub region: String,
    /// Bucket name
    pub bucket: String,
    /// Object key
    pub key: String,
}

impl S3Location {
    /// Read the location through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        match (
            lookup("CONFIG_S3_REGION").filter(|v| !v.is_empty()),
            lookup("CONFIG_S3_BUCKET").filter(|v| !v.is_empty()),
            lookup("CONFIG_S3_KEY").filter(|v| !v.is_empty()),
        ) {
            (Some(region), Some(bucket), Some(key)) => Ok(Self { region, bucket, key }),
            _ => Err(Error::config_load(MISSING_ENV)),
        }
    }

    /// Whether the bucket must be addressed path-style
    ///
    /// A dotted bucket name as a virtual host does not match the
    /// `*.s3.<region>.amazonaws.com` wildcard certificate.
    pub fn needs_path_style(&self) -> bool {
        self.bucket.contains('.')
    }

    fn display(&self) -> String {
        format!("s3://{}/{}", self.bucket, self.key)
    }
}

/// S3-backed configuration source
#[derive(Debug, Clone)]
pub struct S3ConfigSource {
    location: S3Location,
    client: Client,
    document: Arc<RwLock<ConfigDocument>>,
}

impl S3ConfigSource {
    /// Create a source for the given object; nothing is fetched until `load`
    pub fn new(sdk_config: &SdkConfig, location: S3Location) -> Self {
        let conf = aws_sdk_s3::config::Builder::from(sdk_config)
            .region(Region::new(location.region.clone()))
            .force_path_style(location.needs_path_style())
            .build();

        Self {
            client: Client::from_conf(conf),
            location,
            document: Arc::new(RwLock::new(ConfigDocument::new())),
        }
    }

    async fn fetch_object(&self) -> std::result::Result<Vec<u8>, String> {
        let output = self
            .client
            .get_object()
            .bucket(&self.location.bucket)
            .key(&self.location.key)
            .send()
            .await
            .map_err(|e| DisplayErrorContext(e).to_string())?;

        let bytes = output
            .body
            .collect()
            .await
            .map_err(|e| DisplayErrorContext(e).to_string())?;

        Ok(bytes.into_bytes().to_vec())
    }
}

#[async_trait]
impl ConfigSource for S3ConfigSource {
    async fn load(&self) -> Result<()> {
        let bytes = self.fetch_object().await.map_err(|e| {
            tracing::error!("Fetching {} failed: {}", self.location.display(), e);
            Error::config_load(format!("Could not read configuration. Exception: {}", e))
        })?;

        let document = ConfigDocument::from_slice(&bytes).map_err(|e| {
            Error::config_load(format!("Could not read configuration. Exception: {}", e))
        })?;

        tracing::debug!(
            "Loaded configuration from {}: {} hostname(s)",
            self.location.display(),
            document.len()
        );
        *self.document.write().await = document;
        Ok(())
    }

    async fn lookup(&self, hostname: &str, attribute: ConfigAttribute) -> Result<String> {
        self.document.read().await.lookup(hostname, attribute)
    }

    fn source_name(&self) -> &'static str {
        "s3"
    }
}
