//! Local persisted state.
//!
//! Everything the app keeps between launches (bearer token, PIN, biometric
//! flag, last-login metadata) goes through [`KeyValueStore`] so that callers
//! receive the store as a dependency instead of reaching for global state.

pub mod file;
pub mod memory;
pub mod session;

use async_trait::async_trait;
use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use session::{LastLogin, SessionStore};

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Stored data is corrupt: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
    async fn clear(&self) -> Result<(), StorageError>;
}
