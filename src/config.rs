//! Configuration management
//!
//! Configuration is resolved once at startup: an optional TOML file
//! (`SHORTLINK_CONFIG`, default `shortlink.toml`) provides the base values,
//! then environment variables override individual fields. The resolved
//! `Config` is stored in a process-wide `OnceCell` and shared read-only.

use std::env;
use std::fs;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

static CONFIG: OnceCell<Config> = OnceCell::new();

/// Initialize the global configuration. Idempotent.
pub fn init_config() -> &'static Config {
    CONFIG.get_or_init(Config::load)
}

pub fn get_config() -> &'static Config {
    CONFIG.get_or_init(Config::load)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub features: FeatureConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    /// Base used when composing short URLs, e.g. `https://short.example.com`.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Explicit backend selection: `memory`, `file` or `redis`.
    /// When absent, `redis` is used if a Redis URL is configured,
    /// otherwise the volatile `memory` backend.
    #[serde(default)]
    pub backend: Option<String>,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_links_file")]
    pub links_file: String,
    #[serde(default)]
    pub redis: RedisConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_redis_key_prefix")]
    pub key_prefix: String,
    /// Per-mapping TTL in seconds. Defaults to one year.
    #[serde(default = "default_redis_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default = "default_redis_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Deadline for a single command on an established connection.
    #[serde(default = "default_redis_response_timeout_secs")]
    pub response_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureConfig {
    #[serde(default = "default_slug_length")]
    pub slug_length: usize,
}

// Default value functions
fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_public_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_links_file() -> String {
    "links.json".to_string()
}

fn default_redis_key_prefix() -> String {
    "shortlink:".to_string()
}

fn default_redis_ttl_secs() -> u64 {
    31_536_000
}

fn default_redis_connect_timeout_secs() -> u64 {
    60
}

fn default_redis_response_timeout_secs() -> u64 {
    10
}

fn default_slug_length() -> usize {
    7
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            public_base_url: default_public_base_url(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: None,
            data_dir: default_data_dir(),
            links_file: default_links_file(),
            redis: RedisConfig::default(),
        }
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: None,
            key_prefix: default_redis_key_prefix(),
            ttl_secs: default_redis_ttl_secs(),
            connect_timeout_secs: default_redis_connect_timeout_secs(),
            response_timeout_secs: default_redis_response_timeout_secs(),
        }
    }
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            slug_length: default_slug_length(),
        }
    }
}

impl Config {
    fn load() -> Self {
        let mut config = Self::from_file().unwrap_or_default();
        config.apply_env_overrides();
        config
    }

    fn from_file() -> Option<Self> {
        let path = env::var("SHORTLINK_CONFIG").unwrap_or_else(|_| "shortlink.toml".to_string());
        let content = fs::read_to_string(&path).ok()?;
        match toml::from_str(&content) {
            Ok(config) => {
                debug!("configuration loaded from {}", path);
                Some(config)
            }
            Err(e) => {
                warn!("failed to parse {}: {}, using defaults", path, e);
                None
            }
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(host) = env::var("SERVER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = env::var("SERVER_PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => warn!("invalid SERVER_PORT '{}', keeping {}", port, self.server.port),
            }
        }
        if let Ok(base) = env::var("PUBLIC_BASE_URL") {
            self.server.public_base_url = base;
        }
        if let Ok(backend) = env::var("STORAGE_BACKEND") {
            self.storage.backend = Some(backend);
        }
        if let Ok(dir) = env::var("DATA_DIR") {
            self.storage.data_dir = dir;
        }
        if let Ok(file) = env::var("LINKS_FILE") {
            self.storage.links_file = file;
        }
        if let Ok(url) = env::var("REDIS_URL") {
            self.storage.redis.url = Some(url);
        }
        if let Ok(prefix) = env::var("REDIS_KEY_PREFIX") {
            self.storage.redis.key_prefix = prefix;
        }
        if let Ok(ttl) = env::var("REDIS_TTL_SECS")
            && let Ok(ttl) = ttl.parse()
        {
            self.storage.redis.ttl_secs = ttl;
        }
        if let Ok(length) = env::var("SLUG_LENGTH")
            && let Ok(length) = length.parse()
        {
            self.features.slug_length = length;
        }
    }
}
