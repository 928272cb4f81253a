//! Random-stranger pairing.
//!
//! A single process-wide waiting slot holds at most one connection. The
//! next distinct connection to ask for a partner is matched with it. Each
//! decision and its notifications happen inside one write guard, so
//! concurrent requests resolve, and are announced, in a strict order.

use std::collections::HashMap;
use std::sync::Arc;

use omega_common::ConnectionId;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::protocol::{OutboundEvent, SEARCHING};
use crate::registry::Registry;

/// Result of a pairing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairOutcome {
    /// Nobody was waiting; the caller now holds the slot.
    Waiting,
    /// The caller already holds the slot; nothing changed.
    AlreadyWaiting,
    /// The caller was matched with the previous slot holder.
    Matched { partner: ConnectionId },
}

#[derive(Default)]
struct RendezvousState {
    waiting: Option<ConnectionId>,
    /// Formed pairs, recorded in both directions.
    partners: HashMap<ConnectionId, ConnectionId>,
}

impl RendezvousState {
    fn forget_pair(&mut self, id: &ConnectionId) -> Option<ConnectionId> {
        let partner = self.partners.remove(id)?;
        self.partners.remove(&partner);
        Some(partner)
    }
}

#[derive(Clone)]
pub struct Rendezvous {
    state: Arc<RwLock<RendezvousState>>,
    registry: Registry,
}

impl Rendezvous {
    pub fn new(registry: Registry) -> Self {
        Self {
            state: Arc::new(RwLock::new(RendezvousState::default())),
            registry,
        }
    }

    /// Ask for a partner and notify whoever the decision concerns.
    ///
    /// Notifications are queued before the guard is released, so a waiter's
    /// `match-status` always precedes the `partner-found` that ends its wait.
    pub async fn request_pair(&self, id: &ConnectionId) -> PairOutcome {
        let mut state = self.state.write().await;
        let outcome = match state.waiting.take() {
            None => {
                state.forget_pair(id);
                state.waiting = Some(id.clone());
                PairOutcome::Waiting
            }
            Some(holder) if holder == *id => {
                state.waiting = Some(holder);
                PairOutcome::AlreadyWaiting
            }
            Some(partner) => {
                state.forget_pair(id);
                state.partners.insert(id.clone(), partner.clone());
                state.partners.insert(partner.clone(), id.clone());
                PairOutcome::Matched { partner }
            }
        };

        // Registry sends never block and never touch this lock.
        match &outcome {
            PairOutcome::Waiting => {
                debug!(connection = %id, "Waiting for partner");
                self.registry
                    .send_to(id, &OutboundEvent::MatchStatus(SEARCHING.into()))
                    .await;
            }
            PairOutcome::AlreadyWaiting => {
                debug!(connection = %id, "Duplicate pair request ignored");
            }
            PairOutcome::Matched { partner } => {
                info!(connection = %id, partner = %partner, "Matched");
                self.registry
                    .send_to(id, &OutboundEvent::PartnerFound(partner.clone()))
                    .await;
                self.registry
                    .send_to(partner, &OutboundEvent::PartnerFound(id.clone()))
                    .await;
            }
        }
        drop(state);

        outcome
    }

    /// Clear the slot if `id` holds it. Returns true if it did.
    pub async fn release_if_waiting(&self, id: &ConnectionId) -> bool {
        let mut state = self.state.write().await;
        if state.waiting.as_ref() == Some(id) {
            state.waiting = None;
            true
        } else {
            false
        }
    }

    /// Forget the pair `id` belongs to. Returns the former partner.
    pub async fn leave_pair(&self, id: &ConnectionId) -> Option<ConnectionId> {
        self.state.write().await.forget_pair(id)
    }

    pub async fn waiting(&self) -> Option<ConnectionId> {
        self.state.read().await.waiting.clone()
    }

    pub async fn partner_of(&self, id: &ConnectionId) -> Option<ConnectionId> {
        self.state.read().await.partners.get(id).cloned()
    }

    pub async fn are_paired(&self, a: &ConnectionId, b: &ConnectionId) -> bool {
        self.state.read().await.partners.get(a) == Some(b)
    }
}
