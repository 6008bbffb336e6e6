use serde::Deserialize;
use std::env;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    Redis,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    /// 0 keeps searches until they are replaced or cleared
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,
    pub redis_url: Option<String>,
}

impl StoreConfig {
    pub fn ttl(&self) -> Option<Duration> {
        (self.ttl_seconds > 0).then(|| Duration::from_secs(self.ttl_seconds))
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            ttl_seconds: default_ttl_seconds(),
            redis_url: None,
        }
    }
}

fn default_ttl_seconds() -> u64 { 1800 }

#[derive(Debug, Deserialize, Clone)]
pub struct PaginationConfig {
    #[serde(default = "default_limit")]
    pub default_limit: usize,
    pub max_limit: Option<usize>,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: None,
        }
    }
}

fn default_limit() -> usize { 10 }

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Start off by merging in the "default" configuration file
            .add_source(config::File::with_name("config/default"))
            // Optional per-environment overrides, `development` unless RUN_MODE says otherwise
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(environment())
            .build()?;

        s.try_deserialize()
    }
}

/// Eg.. `FARELIST__STORE__BACKEND=redis` sets `store.backend`
fn environment() -> config::Environment {
    config::Environment::with_prefix("FARELIST").separator("__")
}
