//! Connection registry: maps connection IDs to outbound channels and rooms.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use omega_common::ConnectionId;
use tokio::sync::{mpsc, RwLock};
use tracing::debug;

use crate::protocol::OutboundEvent;

#[derive(Default)]
struct RegistryState {
    connections: HashMap<ConnectionId, mpsc::Sender<String>>,
    rooms: HashMap<String, HashSet<ConnectionId>>,
    memberships: HashMap<ConnectionId, HashSet<String>>,
}

/// Thread-safe registry of live connections.
#[derive(Clone)]
pub struct Registry {
    state: Arc<RwLock<RegistryState>>,
    capacity: usize,
}

impl Registry {
    pub fn new(capacity: usize) -> Self {
        Self {
            state: Arc::new(RwLock::new(RegistryState::default())),
            capacity: capacity.max(1),
        }
    }

    /// Register a connection. Returns the receiver its writer task drains.
    pub async fn register(&self, id: &ConnectionId) -> mpsc::Receiver<String> {
        let (tx, rx) = mpsc::channel(self.capacity);
        self.state.write().await.connections.insert(id.clone(), tx);
        rx
    }

    /// Drop a connection and every room membership it held.
    pub async fn unregister(&self, id: &ConnectionId) {
        let mut state = self.state.write().await;
        state.connections.remove(id);
        if let Some(rooms) = state.memberships.remove(id) {
            for room in rooms {
                if let Some(members) = state.rooms.get_mut(&room) {
                    members.remove(id);
                    if members.is_empty() {
                        state.rooms.remove(&room);
                    }
                }
            }
        }
    }

    pub async fn is_connected(&self, id: &ConnectionId) -> bool {
        self.state.read().await.connections.contains_key(id)
    }

    /// Join a room. Unknown connections are ignored.
    pub async fn join(&self, id: &ConnectionId, room: &str) {
        let mut state = self.state.write().await;
        if !state.connections.contains_key(id) {
            return;
        }
        state
            .rooms
            .entry(room.to_string())
            .or_default()
            .insert(id.clone());
        state
            .memberships
            .entry(id.clone())
            .or_default()
            .insert(room.to_string());
    }

    pub async fn leave(&self, id: &ConnectionId, room: &str) {
        let mut state = self.state.write().await;
        if let Some(members) = state.rooms.get_mut(room) {
            members.remove(id);
            if members.is_empty() {
                state.rooms.remove(room);
            }
        }
        if let Some(rooms) = state.memberships.get_mut(id) {
            rooms.remove(room);
        }
    }

    pub async fn room_size(&self, room: &str) -> usize {
        self.state
            .read()
            .await
            .rooms
            .get(room)
            .map_or(0, HashSet::len)
    }

    /// Best-effort send to one connection. Returns false if nothing was queued.
    pub async fn send_to(&self, id: &ConnectionId, event: &OutboundEvent) -> bool {
        let tx = match self.state.read().await.connections.get(id) {
            Some(tx) => tx.clone(),
            None => return false,
        };
        try_deliver(id, &tx, event.to_json())
    }

    /// Best-effort send to every member of a room. Returns how many got it.
    pub async fn send_to_room(&self, room: &str, event: &OutboundEvent) -> usize {
        let targets: Vec<(ConnectionId, mpsc::Sender<String>)> = {
            let state = self.state.read().await;
            match state.rooms.get(room) {
                Some(members) => members
                    .iter()
                    .filter_map(|id| state.connections.get(id).map(|tx| (id.clone(), tx.clone())))
                    .collect(),
                None => return 0,
            }
        };

        let json = event.to_json();
        targets
            .iter()
            .filter(|(id, tx)| try_deliver(id, tx, json.clone()))
            .count()
    }

    /// Number of live connections.
    pub async fn count(&self) -> usize {
        self.state.read().await.connections.len()
    }
}

fn try_deliver(id: &ConnectionId, tx: &mpsc::Sender<String>, json: String) -> bool {
    match tx.try_send(json) {
        Ok(()) => true,
        Err(mpsc::error::TrySendError::Full(_)) => {
            debug!(connection = %id, "Outbound queue full, dropping event");
            false
        }
        Err(mpsc::error::TrySendError::Closed(_)) => {
            debug!(connection = %id, "Outbound channel closed");
            false
        }
    }
}
