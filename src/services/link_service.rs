//! Link allocation and resolution
//!
//! `ShortLinkService` is the orchestration layer between the HTTP handlers
//! and the storage contract: it validates and normalizes the target URL,
//! turns "probably unique" random slugs into a guaranteed-unique stored
//! mapping via a bounded retry loop, and resolves slugs back to their
//! targets. One instance is constructed at startup and shared by all
//! request handlers.

use std::sync::Arc;

use tracing::{debug, info};

use crate::errors::{Result, ShortlinkError};
use crate::slug::{RandomSlugGenerator, SlugGenerator};
use crate::storage::LinkStore;
use crate::utils::{build_short_url, is_valid_url, normalize_url};

/// Retry budget for slug allocation. With a ~2*10^12 id space this is a
/// correctness backstop; exhausting it means the id space is saturated or
/// the store is misbehaving.
pub const MAX_SLUG_ATTEMPTS: usize = 10;

/// Result of a successful allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedLink {
    pub short_url: String,
    pub slug: String,
    pub original_url: String,
}

pub struct ShortLinkService {
    store: Arc<dyn LinkStore>,
    slugs: Arc<dyn SlugGenerator>,
}

impl ShortLinkService {
    pub fn new(store: Arc<dyn LinkStore>) -> Self {
        Self::with_generator(store, Arc::new(RandomSlugGenerator::from_config()))
    }

    pub fn with_generator(store: Arc<dyn LinkStore>, slugs: Arc<dyn SlugGenerator>) -> Self {
        Self { store, slugs }
    }

    /// Allocate a unique slug for `url` and persist the mapping.
    ///
    /// The loop tolerates both an `exists` hit and a lost `save` race (a
    /// concurrent handler storing the same candidate between our check and
    /// our write); either counts as a collision and burns one attempt.
    pub async fn create_short_link(&self, url: &str) -> Result<CreatedLink> {
        let trimmed = url.trim();
        if trimmed.is_empty() {
            return Err(ShortlinkError::invalid_input("URL must not be empty"));
        }

        let normalized = normalize_url(trimmed);
        if !is_valid_url(&normalized) {
            return Err(ShortlinkError::invalid_input(format!(
                "invalid URL: {trimmed}"
            )));
        }

        for attempt in 1..=MAX_SLUG_ATTEMPTS {
            let slug = self.slugs.generate();

            if self.store.exists(&slug).await? {
                debug!("slug collision on attempt {}: {}", attempt, slug);
                continue;
            }

            if self.store.save(&slug, &normalized).await? {
                info!("short link created: {} -> {}", slug, normalized);
                return Ok(CreatedLink {
                    short_url: build_short_url(&slug, None),
                    slug,
                    original_url: normalized,
                });
            }

            debug!("slug taken between check and save on attempt {}: {}", attempt, slug);
        }

        Err(ShortlinkError::slug_allocation_exhausted(format!(
            "no free slug found after {MAX_SLUG_ATTEMPTS} attempts"
        )))
    }

    /// Resolve a slug to its stored target. Unknown slugs are `Ok(None)`.
    pub async fn get_original_url(&self, slug: &str) -> Result<Option<String>> {
        let slug = slug.trim();
        if slug.is_empty() {
            return Ok(None);
        }
        self.store.get(slug).await
    }

    pub async fn slug_exists(&self, slug: &str) -> Result<bool> {
        let slug = slug.trim();
        if slug.is_empty() {
            return Ok(false);
        }
        self.store.exists(slug).await
    }
}
