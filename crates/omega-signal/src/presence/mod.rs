//! Presence: mirrors connection lifecycle into the account live flag.
//!
//! The flag lives in the external account store. Writes are queued to a
//! single background writer so they land in the order they were issued
//! without ever blocking the realtime handlers.

mod http;
mod store;
mod tracker;

use std::sync::Arc;

use omega_common::StoreError;
use omega_config::StoreConfig;

pub use http::HttpLiveStore;
pub use store::{LiveStatusStore, MemoryLiveStore};
pub use tracker::PresenceTracker;

/// Build the store described by the `[store]` config section.
pub fn store_from_config(config: &StoreConfig) -> Result<Arc<dyn LiveStatusStore>, StoreError> {
    match &config.base_url {
        Some(_) => Ok(Arc::new(HttpLiveStore::new(config)?)),
        None => {
            tracing::info!("No store.base_url configured, keeping live flags in memory");
            Ok(Arc::new(MemoryLiveStore::new()))
        }
    }
}
