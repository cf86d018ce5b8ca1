//! Built-in configuration sources and DNS backends

pub mod file;
pub mod memory;

pub use file::FileConfigSource;
pub use memory::{MemoryConfigSource, MemoryDnsBackend};
