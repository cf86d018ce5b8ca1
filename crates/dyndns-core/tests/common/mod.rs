//! Test doubles and common utilities for contract tests
//!
//! These doubles count calls so tests can assert how often the core
//! touched each backend, not just what it returned.

#![allow(dead_code)]

use dyndns_core::config::{ConfigAttribute, ConfigDocument, HostnameConfig};
use dyndns_core::error::{Error, Result};
use dyndns_core::traits::{ConfigSource, DnsBackend};
use dyndns_core::RequestAuthenticator;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const HOSTNAME: &str = "host.domain.com";
pub const SECRET: &str = "1234567890";

/// What the scripted backend returns from `read`
#[derive(Debug, Clone)]
pub enum ReadBehavior {
    /// Return this value
    Value(String),
    /// Fail with a DNS read error carrying this message
    Fail(String),
    /// Fail with the multiple-values integrity error
    MultipleValues,
}

/// What the scripted backend returns from `update`
#[derive(Debug, Clone)]
pub enum WriteBehavior {
    /// Confirm the requested value
    Echo,
    /// Fail with a DNS write error carrying this message
    Fail(String),
}

/// A DnsBackend with scripted results that records every call
pub struct ScriptedDnsBackend {
    read_behavior: ReadBehavior,
    write_behavior: WriteBehavior,
    read_call_count: Arc<AtomicUsize>,
    written: Arc<Mutex<Vec<(String, String)>>>,
}

impl ScriptedDnsBackend {
    pub fn new(read_behavior: ReadBehavior, write_behavior: WriteBehavior) -> Self {
        Self {
            read_behavior,
            write_behavior,
            read_call_count: Arc::new(AtomicUsize::new(0)),
            written: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Backend whose record currently holds `value`
    pub fn holding(value: &str) -> Self {
        Self::new(ReadBehavior::Value(value.to_string()), WriteBehavior::Echo)
    }

    /// Get the number of times read() was called
    pub fn read_call_count(&self) -> usize {
        self.read_call_count.load(Ordering::SeqCst)
    }

    /// Get the number of times update() was called
    pub fn update_call_count(&self) -> usize {
        self.written.lock().unwrap().len()
    }

    /// Get the (hostname, ip) pairs passed to update()
    pub fn writes(&self) -> Vec<(String, String)> {
        self.written.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl DnsBackend for ScriptedDnsBackend {
    async fn read(&self, _hostname: &str) -> Result<String> {
        self.read_call_count.fetch_add(1, Ordering::SeqCst);
        match &self.read_behavior {
            ReadBehavior::Value(value) => Ok(value.clone()),
            ReadBehavior::Fail(msg) => Err(Error::dns_read(msg.clone())),
            ReadBehavior::MultipleValues => Err(Error::MultipleRecordValues),
        }
    }

    async fn update(&self, hostname: &str, ip: &str) -> Result<String> {
        self.written
            .lock()
            .unwrap()
            .push((hostname.to_string(), ip.to_string()));
        match &self.write_behavior {
            WriteBehavior::Echo => Ok(ip.to_string()),
            WriteBehavior::Fail(msg) => Err(Error::dns_write(msg.clone())),
        }
    }

    fn backend_name(&self) -> &'static str {
        "scripted"
    }
}

/// A ConfigSource over a fixed document that counts lookups
pub struct CountingConfigSource {
    document: ConfigDocument,
    lookup_call_count: Arc<AtomicUsize>,
}

impl CountingConfigSource {
    pub fn new(document: ConfigDocument) -> Self {
        Self {
            document,
            lookup_call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the number of times lookup() was called
    pub fn lookup_call_count(&self) -> usize {
        self.lookup_call_count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ConfigSource for CountingConfigSource {
    async fn load(&self) -> Result<()> {
        Ok(())
    }

    async fn lookup(&self, hostname: &str, attribute: ConfigAttribute) -> Result<String> {
        self.lookup_call_count.fetch_add(1, Ordering::SeqCst);
        self.document.lookup(hostname, attribute)
    }

    fn source_name(&self) -> &'static str {
        "counting"
    }
}

/// Helper to create a complete configuration entry for a hostname
pub fn hostname_config(secret: &str) -> HostnameConfig {
    HostnameConfig::new("eu-central-1", "Z0000000TEST", "A", 60, secret)
}

/// Helper to create a document configuring [`HOSTNAME`] with [`SECRET`]
pub fn minimal_document() -> ConfigDocument {
    ConfigDocument::new().with_host(HOSTNAME, &hostname_config(SECRET))
}

/// The hash a legitimate client would send
pub fn client_hash(source_ip: &str, hostname: &str, secret: &str) -> String {
    RequestAuthenticator::compute_hash(source_ip, hostname, secret)
}
