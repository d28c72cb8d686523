//! Random slug generation
//!
//! Slugs are short URL-safe identifiers drawn uniformly at random from an
//! alphabet that leaves out the visually confusable characters
//! (`I`/`l`, `O`/`o` lookalikes). Generation is pure computation: no counter,
//! no clock, no storage access. Uniqueness is enforced by the allocation
//! loop in the link service, not here.

use crate::config::get_config;

/// Digits and letters, minus `I L O i l o`.
pub const SLUG_ALPHABET: &[u8] = b"0123456789ABCDEFGHJKMNPQRSTUVWXYZabcdefghjkmnpqrstuvwxyz";

pub const DEFAULT_SLUG_LENGTH: usize = 7;

/// A source of candidate slugs.
///
/// Implementations never check uniqueness; with the default alphabet and
/// length the id space is about 2*10^12, so collisions are a retry
/// backstop rather than an expected event.
pub trait SlugGenerator: Send + Sync {
    fn generate(&self) -> String;
}

pub struct RandomSlugGenerator {
    length: usize,
}

impl RandomSlugGenerator {
    pub fn new(length: usize) -> Self {
        Self { length }
    }

    pub fn from_config() -> Self {
        Self::new(get_config().features.slug_length)
    }
}

impl Default for RandomSlugGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_SLUG_LENGTH)
    }
}

impl SlugGenerator for RandomSlugGenerator {
    fn generate(&self) -> String {
        use std::iter;

        iter::repeat_with(|| SLUG_ALPHABET[rand::random_range(0..SLUG_ALPHABET.len())] as char)
            .take(self.length)
            .collect()
    }
}
