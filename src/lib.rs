//! Shortlink - a small URL shortener service
//!
//! Maps long URLs to short random slugs and resolves them back via
//! redirect.
//!
//! # Architecture
//! - `slug`: random slug generation (pure, no storage access)
//! - `storage`: the slug→URL mapping contract and its backends
//!   (memory, file, Redis), selected once at startup
//! - `services`: allocation orchestration (validate, generate, retry,
//!   persist) and slug resolution
//! - `api`: the thin actix-web handlers on top of the service
//! - `config`: TOML + environment configuration, resolved once
//! - `utils`: URL validation, normalization and short-URL composition

pub mod api;
pub mod config;
pub mod errors;
pub mod services;
pub mod slug;
pub mod storage;
pub mod utils;
