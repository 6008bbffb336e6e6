pub mod app_config;
pub mod redis_repo;
pub mod result_store;

use std::sync::Arc;
use std::time::Duration;

pub use redis_repo::RedisResultStore;
pub use result_store::{MemoryResultStore, ResultStore, StoreError, StoreResult};

use app_config::{StoreBackend, StoreConfig};

/// Builds the result store selected by configuration
pub async fn connect(config: &StoreConfig) -> StoreResult<Arc<dyn ResultStore>> {
    let ttl = config.ttl();
    match config.backend {
        StoreBackend::Memory => {
            tracing::info!("Using in-memory result store (ttl: {:?})", ttl);
            Ok(Arc::new(MemoryResultStore::with_ttl(ttl)))
        }
        StoreBackend::Redis => {
            let url = config
                .redis_url
                .as_deref()
                .ok_or(StoreError::MissingRedisUrl)?;
            let store = RedisResultStore::new(url, ttl.as_ref().map(Duration::as_secs)).await?;
            tracing::info!("Using Redis result store");
            Ok(Arc::new(store))
        }
    }
}
