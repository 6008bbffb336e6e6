use std::sync::Arc;

use farelist_core::FilterOptions;
use farelist_store::app_config::PaginationConfig;
use farelist_store::{MemoryResultStore, ResultStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ResultStore>,
    pub filter_options: FilterOptions,
}

impl AppState {
    pub fn new(store: Arc<dyn ResultStore>, pagination: &PaginationConfig) -> Self {
        Self {
            store,
            filter_options: FilterOptions {
                default_limit: pagination.default_limit,
                max_limit: pagination.max_limit,
                ..FilterOptions::default()
            },
        }
    }

    /// Process-local store, no expiry, default pagination
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryResultStore::new()), &PaginationConfig::default())
    }
}
