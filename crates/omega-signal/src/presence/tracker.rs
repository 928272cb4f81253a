//! Connection → account bindings and the live-flag writer.

use std::collections::HashMap;
use std::sync::Arc;

use omega_common::{AccountId, ConnectionId};
use tokio::sync::{mpsc, oneshot, RwLock};
use tracing::{debug, info, warn};

use super::store::LiveStatusStore;
use crate::registry::Registry;

enum WriteOp {
    SetLive { account: AccountId, live: bool },
    Flush(oneshot::Sender<()>),
}

#[derive(Clone)]
pub struct PresenceTracker {
    bindings: Arc<RwLock<HashMap<ConnectionId, AccountId>>>,
    registry: Registry,
    writes: mpsc::UnboundedSender<WriteOp>,
}

impl PresenceTracker {
    /// Create the tracker and spawn its store writer. Needs a tokio runtime.
    pub fn new(registry: Registry, store: Arc<dyn LiveStatusStore>) -> Self {
        let (writes, rx) = mpsc::unbounded_channel();
        tokio::spawn(write_loop(rx, store));
        Self {
            bindings: Arc::new(RwLock::new(HashMap::new())),
            registry,
            writes,
        }
    }

    /// Bind `connection` to `account`, join the account room, flag it live.
    pub async fn set_live(&self, account: &AccountId, connection: &ConnectionId) {
        let previous = self
            .bindings
            .write()
            .await
            .insert(connection.clone(), account.clone());

        if let Some(old) = previous.filter(|old| old != account) {
            debug!(connection = %connection, old = %old, new = %account, "Switching live account");
            self.registry.leave(connection, &old.user_room()).await;
            self.queue(old, false);
        }

        self.registry.join(connection, &account.user_room()).await;
        self.queue(account.clone(), true);
        info!(account = %account, connection = %connection, "Account is now live");
    }

    /// Flag whatever account `connection` went live as, if any, not live.
    pub async fn clear_live(&self, connection: &ConnectionId) -> Option<AccountId> {
        let account = self.bindings.write().await.remove(connection)?;
        self.queue(account.clone(), false);
        info!(account = %account, connection = %connection, "Account is no longer live");
        Some(account)
    }

    /// Flag every bound account not live. Used on shutdown, when
    /// connection tasks will not get to run their own cleanup.
    pub async fn clear_all(&self) -> usize {
        let bindings = std::mem::take(&mut *self.bindings.write().await);
        let cleared = bindings.len();
        for account in bindings.into_values() {
            self.queue(account, false);
        }
        if cleared > 0 {
            info!(accounts = cleared, "Cleared live flags on shutdown");
        }
        cleared
    }

    pub async fn account_of(&self, connection: &ConnectionId) -> Option<AccountId> {
        self.bindings.read().await.get(connection).cloned()
    }

    /// Wait until every write queued so far has been attempted.
    pub async fn flush(&self) {
        let (tx, rx) = oneshot::channel();
        if self.writes.send(WriteOp::Flush(tx)).is_ok() {
            let _ = rx.await;
        }
    }

    fn queue(&self, account: AccountId, live: bool) {
        if self.writes.send(WriteOp::SetLive { account, live }).is_err() {
            warn!("Presence writer stopped, live flag update lost");
        }
    }
}

async fn write_loop(mut rx: mpsc::UnboundedReceiver<WriteOp>, store: Arc<dyn LiveStatusStore>) {
    while let Some(op) = rx.recv().await {
        match op {
            WriteOp::SetLive { account, live } => {
                if let Err(e) = store.set_live(&account, live).await {
                    warn!(account = %account, live, error = %e, "Live flag update failed");
                }
            }
            WriteOp::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
}
