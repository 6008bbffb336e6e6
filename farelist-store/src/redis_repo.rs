use std::sync::Arc;

use async_trait::async_trait;
use farelist_shared::FlightOffer;
use redis::AsyncCommands;
use tracing::info;

use crate::result_store::{ResultStore, StoreResult};

/// Keeps each session's latest search as one JSON value under `search:{session_id}`
#[derive(Clone)]
pub struct RedisResultStore {
    client: redis::Client,
    ttl_seconds: Option<u64>,
}

impl RedisResultStore {
    pub async fn new(connection_string: &str, ttl_seconds: Option<u64>) -> StoreResult<Self> {
        let client = redis::Client::open(connection_string)?;
        Ok(Self { client, ttl_seconds })
    }

    fn key(session_id: &str) -> String {
        format!("search:{}", session_id)
    }
}

#[async_trait]
impl ResultStore for RedisResultStore {
    async fn replace(&self, session_id: &str, offers: Vec<FlightOffer>) -> StoreResult<usize> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let payload = serde_json::to_string(&offers)?;
        let key = Self::key(session_id);
        match self.ttl_seconds {
            Some(ttl) => conn.set_ex::<_, _, ()>(key, payload, ttl).await?,
            None => conn.set::<_, _, ()>(key, payload).await?,
        }
        info!("Stored {} offers for session {}", offers.len(), session_id);
        Ok(offers.len())
    }

    async fn snapshot(&self, session_id: &str) -> StoreResult<Option<Arc<Vec<FlightOffer>>>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let payload: Option<String> = conn.get(Self::key(session_id)).await?;
        match payload {
            Some(raw) => Ok(Some(Arc::new(serde_json::from_str(&raw)?))),
            None => Ok(None),
        }
    }

    async fn clear(&self, session_id: &str) -> StoreResult<bool> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let removed: i64 = conn.del(Self::key(session_id)).await?;
        if removed > 0 {
            info!("Cleared stored search for session {}", session_id);
        }
        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_key_layout() {
        assert_eq!(RedisResultStore::key("abc-123"), "search:abc-123");
    }

    #[tokio::test]
    async fn test_rejects_malformed_url() {
        assert!(RedisResultStore::new("not a url", None).await.is_err());
    }
}
