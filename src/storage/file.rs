//! File-backed store
//!
//! All mappings live in one JSON document (`{"<slug>": "<url>", ...}`)
//! under the data directory, which is created on demand. The document is
//! loaded into an in-process cache on first access and rewritten in full on
//! every save. The cache serializes in-process readers and writers; there
//! is no inter-process locking, so concurrent writer processes are
//! unsupported.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::LinkStore;
use crate::config::Config;
use crate::errors::{Result, ShortlinkError};

enum CacheState {
    Unloaded,
    Loaded(HashMap<String, String>),
}

pub struct FileStore {
    path: PathBuf,
    cache: RwLock<CacheState>,
}

impl FileStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            cache: RwLock::new(CacheState::Unloaded),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let path = Path::new(&config.storage.data_dir).join(&config.storage.links_file);
        Self::new(path)
    }

    /// First-access transition from `Unloaded` to `Loaded`.
    async fn ensure_loaded(&self) -> Result<()> {
        {
            let state = self.cache.read().await;
            if matches!(*state, CacheState::Loaded(_)) {
                return Ok(());
            }
        }

        let mut state = self.cache.write().await;
        // another handler may have loaded while we waited for the lock
        if matches!(*state, CacheState::Loaded(_)) {
            return Ok(());
        }

        let links = self.read_document()?;
        info!(
            "loaded {} mappings from {}",
            links.len(),
            self.path.display()
        );
        *state = CacheState::Loaded(links);
        Ok(())
    }

    /// Drop the cache and re-read the document on next access.
    pub async fn reload(&self) {
        let mut state = self.cache.write().await;
        *state = CacheState::Unloaded;
        debug!("file store cache invalidated");
    }

    fn read_document(&self) -> Result<HashMap<String, String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => serde_json::from_str(&content).map_err(|e| {
                ShortlinkError::serialization(format!(
                    "failed to parse {}: {e}",
                    self.path.display()
                ))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                if let Some(parent) = self.path.parent()
                    && !parent.as_os_str().is_empty()
                {
                    fs::create_dir_all(parent)?;
                }
                fs::write(&self.path, "{}")?;
                debug!("created empty links document at {}", self.path.display());
                Ok(HashMap::new())
            }
            Err(e) => Err(ShortlinkError::storage_unavailable(format!(
                "failed to read {}: {e}",
                self.path.display()
            ))),
        }
    }

    fn write_document(&self, links: &HashMap<String, String>) -> Result<()> {
        let json = serde_json::to_string_pretty(links)?;
        fs::write(&self.path, json).map_err(|e| {
            ShortlinkError::storage_unavailable(format!(
                "failed to write {}: {e}",
                self.path.display()
            ))
        })
    }

    fn save_locked(
        &self,
        links: &mut HashMap<String, String>,
        slug: &str,
        url: &str,
    ) -> Result<bool> {
        if links.contains_key(slug) {
            return Ok(false);
        }

        links.insert(slug.to_string(), url.to_string());
        if let Err(e) = self.write_document(links) {
            // keep cache and document in agreement
            links.remove(slug);
            return Err(e);
        }
        Ok(true)
    }
}

#[async_trait]
impl LinkStore for FileStore {
    async fn save(&self, slug: &str, url: &str) -> Result<bool> {
        let mut state = self.cache.write().await;
        if matches!(*state, CacheState::Unloaded) {
            *state = CacheState::Loaded(self.read_document()?);
        }
        let CacheState::Loaded(links) = &mut *state else {
            unreachable!()
        };
        self.save_locked(links, slug, url)
    }

    async fn get(&self, slug: &str) -> Result<Option<String>> {
        self.ensure_loaded().await?;

        let state = self.cache.read().await;
        match &*state {
            CacheState::Loaded(links) => Ok(links.get(slug).cloned()),
            // a concurrent reload won the write lock first; read the document directly
            CacheState::Unloaded => Ok(self.read_document()?.get(slug).cloned()),
        }
    }

    async fn exists(&self, slug: &str) -> Result<bool> {
        self.ensure_loaded().await?;

        let state = self.cache.read().await;
        match &*state {
            CacheState::Loaded(links) => Ok(links.contains_key(slug)),
            CacheState::Unloaded => Ok(self.read_document()?.contains_key(slug)),
        }
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}
