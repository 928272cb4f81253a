//! Account live-flag store seam.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use omega_common::{AccountId, StoreError};
use tokio::sync::RwLock;

/// Writes the live flag of an account. Implementations must be idempotent.
#[async_trait]
pub trait LiveStatusStore: Send + Sync {
    async fn set_live(&self, account: &AccountId, live: bool) -> Result<(), StoreError>;
}

/// In-process store used when no external store is configured.
#[derive(Clone, Default)]
pub struct MemoryLiveStore {
    flags: Arc<RwLock<HashMap<AccountId, bool>>>,
}

impl MemoryLiveStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn is_live(&self, account: &AccountId) -> Option<bool> {
        self.flags.read().await.get(account).copied()
    }

    /// Accounts currently flagged live.
    pub async fn live_accounts(&self) -> Vec<AccountId> {
        self.flags
            .read()
            .await
            .iter()
            .filter(|(_, live)| **live)
            .map(|(account, _)| account.clone())
            .collect()
    }
}

#[async_trait]
impl LiveStatusStore for MemoryLiveStore {
    async fn set_live(&self, account: &AccountId, live: bool) -> Result<(), StoreError> {
        self.flags.write().await.insert(account.clone(), live);
        Ok(())
    }
}
