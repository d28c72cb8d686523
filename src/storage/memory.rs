//! Volatile in-process store, the fallback when nothing persistent is
//! configured. Lifetime of the data equals the lifetime of the process.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use super::LinkStore;
use crate::errors::Result;

#[derive(Default)]
pub struct MemoryStore {
    links: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LinkStore for MemoryStore {
    async fn save(&self, slug: &str, url: &str) -> Result<bool> {
        match self.links.entry(slug.to_string()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(entry) => {
                entry.insert(url.to_string());
                Ok(true)
            }
        }
    }

    async fn get(&self, slug: &str) -> Result<Option<String>> {
        Ok(self.links.get(slug).map(|url| url.value().clone()))
    }

    async fn exists(&self, slug: &str) -> Result<bool> {
        Ok(self.links.contains_key(slug))
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
