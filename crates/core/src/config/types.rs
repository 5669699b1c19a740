use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub seed: SeedConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Browser origins allowed to call the API (the ticket UI).
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origins() -> Vec<String> {
    vec!["http://localhost:3000".to_string()]
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("helpdesk.db")
}

/// How the listing cache forgets pages after a ticket write.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InvalidationMode {
    /// Drop every cached page the cache is currently holding.
    #[default]
    Exact,
    /// Drop a fixed set of commonly requested page/size pairs only.
    /// Pages outside that set stay stale until their window lapses.
    Sweep,
}

/// Listing cache configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Sliding expiration window in seconds, renewed on every hit.
    #[serde(default = "default_sliding_expiration_secs")]
    pub sliding_expiration_secs: u64,
    #[serde(default)]
    pub invalidation: InvalidationMode,
    /// Most pages held at once; the least recently used page is evicted first.
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

impl CacheConfig {
    pub fn sliding_expiration(&self) -> Duration {
        Duration::from_secs(self.sliding_expiration_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            sliding_expiration_secs: default_sliding_expiration_secs(),
            invalidation: InvalidationMode::default(),
            max_entries: default_max_entries(),
        }
    }
}

fn default_sliding_expiration_secs() -> u64 {
    60
}

fn default_max_entries() -> usize {
    1000
}

/// Sample data import run at startup when the store is empty.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SeedConfig {
    /// JSON file holding an array of sample tickets. No import when unset.
    #[serde(default)]
    pub path: Option<PathBuf>,
}
