//! Event dispatch: the glue between a connection and the components.

use std::sync::Arc;

use omega_common::ConnectionId;
use omega_config::OmegaConfig;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::presence::{LiveStatusStore, PresenceTracker};
use crate::protocol::{
    Connected, DirectSignal, ErrorNotice, InboundEvent, JoinStream, OutboundEvent, PairSignal,
    SignalKind, ViewerJoined,
};
use crate::registry::Registry;
use crate::relay::{Delivery, SignalRelay};
use crate::rendezvous::Rendezvous;

/// Shared handle to every realtime component. Cheap to clone.
#[derive(Clone)]
pub struct Hub {
    registry: Registry,
    rendezvous: Rendezvous,
    relay: SignalRelay,
    presence: PresenceTracker,
    notify_failures: bool,
}

impl Hub {
    pub fn new(config: &OmegaConfig, store: Arc<dyn LiveStatusStore>) -> Self {
        let registry = Registry::new(config.server.channel_capacity as usize);
        let rendezvous = Rendezvous::new(registry.clone());
        let relay = SignalRelay::new(
            registry.clone(),
            rendezvous.clone(),
            config.rendezvous.enforce_pairing,
        );
        let presence = PresenceTracker::new(registry.clone(), store);
        Self {
            registry,
            rendezvous,
            relay,
            presence,
            notify_failures: config.server.notify_failures,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn rendezvous(&self) -> &Rendezvous {
        &self.rendezvous
    }

    pub fn presence(&self) -> &PresenceTracker {
        &self.presence
    }

    /// Register a new connection and greet it with its identifier.
    pub async fn connect(&self) -> (ConnectionId, mpsc::Receiver<String>) {
        let id = ConnectionId::new();
        let rx = self.registry.register(&id).await;
        self.registry
            .send_to(
                &id,
                &OutboundEvent::Connected(Connected {
                    connection_id: id.clone(),
                }),
            )
            .await;
        (id, rx)
    }

    /// Decode and dispatch one text frame. Malformed frames are dropped.
    pub async fn handle_text(&self, id: &ConnectionId, text: &str) {
        match serde_json::from_str::<InboundEvent>(text) {
            Ok(event) => self.handle(id, event).await,
            Err(e) => {
                debug!(connection = %id, error = %e, "Dropping malformed event");
                self.notify_failure(id, format!("malformed event: {e}")).await;
            }
        }
    }

    pub async fn handle(&self, id: &ConnectionId, event: InboundEvent) {
        let name = event.name();
        let delivery = match event {
            InboundEvent::GoLive(account) => {
                self.presence.set_live(&account, id).await;
                None
            }
            InboundEvent::JoinStream(join) => {
                self.join_stream(id, join).await;
                None
            }
            InboundEvent::RequestPair(_) => {
                self.rendezvous.request_pair(id).await;
                None
            }
            InboundEvent::Offer(signal) => Some(self.direct(SignalKind::Offer, id, signal).await),
            InboundEvent::Answer(signal) => Some(self.direct(SignalKind::Answer, id, signal).await),
            InboundEvent::IceCandidate(signal) => {
                Some(self.direct(SignalKind::IceCandidate, id, signal).await)
            }
            InboundEvent::OfferM(signal) => Some(self.matched(SignalKind::Offer, id, signal).await),
            InboundEvent::AnswerM(signal) => {
                Some(self.matched(SignalKind::Answer, id, signal).await)
            }
            InboundEvent::IceM(signal) => {
                Some(self.matched(SignalKind::IceCandidate, id, signal).await)
            }
        };

        match delivery {
            Some(Delivery::TargetGone) => {
                self.notify_failure(id, format!("{name}: target is not connected"))
                    .await;
            }
            Some(Delivery::NotPaired) => {
                self.notify_failure(id, format!("{name}: target is not your partner"))
                    .await;
            }
            _ => {}
        }
    }

    /// Cleanup for a closed connection. The waiting slot is released first.
    pub async fn disconnect(&self, id: &ConnectionId) {
        if self.rendezvous.release_if_waiting(id).await {
            debug!(connection = %id, "Released waiting slot");
        }
        if let Some(partner) = self.rendezvous.leave_pair(id).await {
            self.registry
                .send_to(&partner, &OutboundEvent::PartnerLeft(id.clone()))
                .await;
        }
        self.presence.clear_live(id).await;
        self.registry.unregister(id).await;
        let remaining = self.registry.count().await;
        info!(connection = %id, remaining, "Connection cleaned up");
    }

    async fn join_stream(&self, id: &ConnectionId, join: JoinStream) {
        self.registry
            .join(id, &join.target_account_id.stream_room())
            .await;
        let event = OutboundEvent::ViewerJoined(ViewerJoined {
            account_id: join.account_id,
        });
        let notified = self
            .registry
            .send_to_room(&join.target_account_id.user_room(), &event)
            .await;
        debug!(connection = %id, target = %join.target_account_id, notified, "Viewer joined stream");
    }

    async fn direct(&self, kind: SignalKind, id: &ConnectionId, signal: DirectSignal) -> Delivery {
        self.relay
            .relay_to_account(kind, signal.payload, id, &signal.target_account_id)
            .await
    }

    async fn matched(&self, kind: SignalKind, id: &ConnectionId, signal: PairSignal) -> Delivery {
        self.relay.relay(kind, signal.payload, id, &signal.target).await
    }

    async fn notify_failure(&self, id: &ConnectionId, message: String) {
        if self.notify_failures {
            self.registry
                .send_to(id, &OutboundEvent::Error(ErrorNotice { message }))
                .await;
        }
    }
}

#[cfg(test)]
mod tests;
