//! Core traits for the dynamic DNS service
//!
//! This module defines the abstract interfaces the core consumes.
//!
//! - [`ConfigSource`]: Per-hostname configuration lookup
//! - [`DnsBackend`]: Read and write the single value of a DNS record

pub mod config_source;
pub mod dns_backend;

pub use config_source::ConfigSource;
pub use dns_backend::DnsBackend;
