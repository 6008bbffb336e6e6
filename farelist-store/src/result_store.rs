use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use farelist_shared::FlightOffer;
use tokio::sync::RwLock;
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("Stored search could not be decoded: {0}")]
    Codec(#[from] serde_json::Error),
    #[error("store.redis_url is required for the redis backend")]
    MissingRedisUrl,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Holds the latest search result of each session.
///
/// A new search replaces the previous one for that session. Readers get an
/// immutable snapshot, so a replacement never changes a set being filtered.
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Stores `offers` as the session's latest search. Returns how many were stored.
    async fn replace(&self, session_id: &str, offers: Vec<FlightOffer>) -> StoreResult<usize>;

    /// Latest search for the session, or `None` if there is none (or it expired)
    async fn snapshot(&self, session_id: &str) -> StoreResult<Option<Arc<Vec<FlightOffer>>>>;

    /// Drops the session's search. Returns whether anything was stored.
    async fn clear(&self, session_id: &str) -> StoreResult<bool>;

    /// Drops expired searches. Backends that expire on their own report 0.
    async fn purge_expired(&self) -> StoreResult<usize> {
        Ok(0)
    }
}

struct StoredSearch {
    offers: Arc<Vec<FlightOffer>>,
    stored_at: Instant,
}

/// Process-local store keyed by session id
pub struct MemoryResultStore {
    searches: RwLock<HashMap<String, StoredSearch>>,
    ttl: Option<Duration>,
}

impl MemoryResultStore {
    pub fn new() -> Self {
        Self::with_ttl(None)
    }

    /// Entries older than `ttl` are treated as absent
    pub fn with_ttl(ttl: Option<Duration>) -> Self {
        Self {
            searches: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    fn is_expired(&self, search: &StoredSearch) -> bool {
        self.ttl
            .is_some_and(|ttl| search.stored_at.elapsed() >= ttl)
    }

    pub async fn session_count(&self) -> usize {
        self.searches.read().await.len()
    }
}

impl Default for MemoryResultStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResultStore for MemoryResultStore {
    async fn replace(&self, session_id: &str, offers: Vec<FlightOffer>) -> StoreResult<usize> {
        let count = offers.len();
        let search = StoredSearch {
            offers: Arc::new(offers),
            stored_at: Instant::now(),
        };
        self.searches
            .write()
            .await
            .insert(session_id.to_string(), search);
        info!("Stored {} offers for session {}", count, session_id);
        Ok(count)
    }

    async fn snapshot(&self, session_id: &str) -> StoreResult<Option<Arc<Vec<FlightOffer>>>> {
        let searches = self.searches.read().await;
        Ok(searches
            .get(session_id)
            .filter(|search| !self.is_expired(search))
            .map(|search| Arc::clone(&search.offers)))
    }

    async fn clear(&self, session_id: &str) -> StoreResult<bool> {
        let removed = self.searches.write().await.remove(session_id).is_some();
        if removed {
            info!("Cleared stored search for session {}", session_id);
        }
        Ok(removed)
    }

    async fn purge_expired(&self) -> StoreResult<usize> {
        let mut searches = self.searches.write().await;
        let before = searches.len();
        searches.retain(|_, search| !self.is_expired(search));
        let removed = before - searches.len();
        if removed > 0 {
            debug!("Purged {} expired searches", removed);
        }
        Ok(removed)
    }
}
