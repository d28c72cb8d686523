//! Mapping storage
//!
//! One slug→URL key-value contract, three interchangeable backends:
//! `memory` (volatile), `file` (single JSON document on disk) and `redis`
//! (namespaced keys with TTL). The backend is selected once at startup by
//! [`StoreFactory`] and the resulting instance is shared by every request
//! handler for the lifetime of the process.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::config::Config;
use crate::errors::{Result, ShortlinkError};

pub mod file;
pub mod memory;
pub mod redis;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use redis::RedisStore;

#[async_trait]
pub trait LinkStore: Send + Sync {
    /// Conditionally store `slug -> url`.
    ///
    /// Returns `Ok(true)` when the mapping was newly stored and `Ok(false)`
    /// when the slug is already taken. Backends use a set-if-absent
    /// primitive where the medium offers one, so an existing mapping is
    /// never silently replaced.
    async fn save(&self, slug: &str, url: &str) -> Result<bool>;

    /// Look up the target URL for a slug. A missing slug is `Ok(None)`,
    /// never an error.
    async fn get(&self, slug: &str) -> Result<Option<String>>;

    /// True iff a mapping for `slug` is currently present.
    async fn exists(&self, slug: &str) -> Result<bool>;

    fn backend_name(&self) -> &'static str;
}

pub struct StoreFactory;

impl StoreFactory {
    /// Build the store the deployment configuration asks for.
    ///
    /// An explicit `storage.backend` wins; otherwise the presence of a
    /// Redis URL selects the distributed backend, and the volatile memory
    /// store is the fallback.
    pub async fn create(config: &Config) -> Result<Arc<dyn LinkStore>> {
        let backend = match config.storage.backend.as_deref() {
            Some(name) => name.to_string(),
            None if config.storage.redis.url.is_some() => "redis".to_string(),
            None => "memory".to_string(),
        };

        let store: Arc<dyn LinkStore> = match backend.as_str() {
            "memory" => Arc::new(MemoryStore::new()),
            "file" => Arc::new(FileStore::from_config(config)),
            "redis" => Arc::new(RedisStore::connect(config).await?),
            other => {
                return Err(ShortlinkError::storage_unavailable(format!(
                    "unknown storage backend: {other}"
                )));
            }
        };

        info!("using storage backend: {}", store.backend_name());
        Ok(store)
    }
}
