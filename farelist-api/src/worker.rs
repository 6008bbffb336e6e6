use std::sync::Arc;
use std::time::Duration;

use farelist_store::ResultStore;
use tracing::{debug, error};

/// Periodically drops expired searches from stores that do not expire on their own
pub async fn start_purge_worker(store: Arc<dyn ResultStore>, every: Duration) {
    let mut ticker = tokio::time::interval(every);
    loop {
        ticker.tick().await;
        match store.purge_expired().await {
            Ok(0) => {}
            Ok(removed) => debug!("Purge worker dropped {} expired searches", removed),
            Err(e) => error!("Purge worker failed: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use farelist_store::MemoryResultStore;

    #[tokio::test]
    async fn test_worker_purges_expired_searches() {
        let store = Arc::new(MemoryResultStore::with_ttl(Some(Duration::ZERO)));
        store.replace("s1", Vec::new()).await.unwrap();
        assert_eq!(store.session_count().await, 1);

        let handle = tokio::spawn(start_purge_worker(store.clone(), Duration::from_millis(5)));
        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.abort();

        assert_eq!(store.session_count().await, 0);
    }
}
