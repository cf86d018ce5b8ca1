// # File Config Source
//
// JSON-file implementation of ConfigSource.
//
// ## Purpose
//
// Serves the hostname configuration document from local disk, for
// deployments that mount their configuration instead of fetching it from
// object storage.
//
// ## Reload Behavior
//
// - `load` re-reads and re-parses the whole file
// - The new document replaces the old one only if parsing succeeds
// - A failed load keeps serving the previous snapshot

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::RwLock;

use crate::config::{ConfigAttribute, ConfigDocument};
use crate::error::{Error, Result};
use crate::traits::ConfigSource;

/// File-based configuration source
///
/// # Example
///
/// ```rust,no_run
/// use dyndns_core::source::FileConfigSource;
/// use dyndns_core::ConfigSource;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let source = FileConfigSource::new("/etc/dyndns/config.json");
///     source.load().await?;
///
///     let config = source.hostname_config("host.domain.com").await?;
///     println!("zone: {}", config.zone_id);
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FileConfigSource {
    path: PathBuf,
    document: Arc<RwLock<ConfigDocument>>,
}

impl FileConfigSource {
    /// Create a source for the given path; nothing is read until `load`
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            document: Arc::new(RwLock::new(ConfigDocument::new())),
        }
    }

    async fn read_document(&self) -> Result<ConfigDocument> {
        let bytes = fs::read(&self.path).await.map_err(|e| {
            Error::config_load(format!(
                "Could not read configuration. Exception: {}: {}",
                self.path.display(),
                e
            ))
        })?;

        ConfigDocument::from_slice(&bytes).map_err(|e| {
            Error::config_load(format!("Could not read configuration. Exception: {}", e))
        })
    }
}

#[async_trait]
impl ConfigSource for FileConfigSource {
    async fn load(&self) -> Result<()> {
        let document = self.read_document().await?;
        tracing::debug!(
            "Loaded configuration from {}: {} hostname(s)",
            self.path.display(),
            document.len()
        );
        *self.document.write().await = document;
        Ok(())
    }

    async fn lookup(&self, hostname: &str, attribute: ConfigAttribute) -> Result<String> {
        self.document.read().await.lookup(hostname, attribute)
    }

    fn source_name(&self) -> &'static str {
        "file"
    }
}
