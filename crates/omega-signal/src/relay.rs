//! Signaling relay: forwards offer/answer/ICE payloads untouched.

use omega_common::{AccountId, ConnectionId};
use serde_json::Value;
use tracing::debug;

use crate::protocol::{Relayed, SignalKind};
use crate::registry::Registry;
use crate::rendezvous::Rendezvous;

/// What happened to a relayed signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Queued for this many connections.
    Delivered(usize),
    /// Nobody was there to receive it.
    TargetGone,
    /// Refused because the two connections are not a matched pair.
    NotPaired,
}

#[derive(Clone)]
pub struct SignalRelay {
    registry: Registry,
    rendezvous: Rendezvous,
    enforce_pairing: bool,
}

impl SignalRelay {
    pub fn new(registry: Registry, rendezvous: Rendezvous, enforce_pairing: bool) -> Self {
        Self {
            registry,
            rendezvous,
            enforce_pairing,
        }
    }

    /// Forward a signal to a single connection as the matched-pair event.
    pub async fn relay(
        &self,
        kind: SignalKind,
        payload: Value,
        from: &ConnectionId,
        to: &ConnectionId,
    ) -> Delivery {
        if self.enforce_pairing && !self.rendezvous.are_paired(from, to).await {
            debug!(from = %from, to = %to, ?kind, "Relay refused, not paired");
            return Delivery::NotPaired;
        }

        let event = kind.matched(Relayed {
            payload,
            from: from.clone(),
        });
        if self.registry.send_to(to, &event).await {
            Delivery::Delivered(1)
        } else {
            debug!(from = %from, to = %to, ?kind, "Relay target gone");
            Delivery::TargetGone
        }
    }

    /// Forward a signal to every connection live as `account`.
    pub async fn relay_to_account(
        &self,
        kind: SignalKind,
        payload: Value,
        from: &ConnectionId,
        account: &AccountId,
    ) -> Delivery {
        let event = kind.direct(Relayed {
            payload,
            from: from.clone(),
        });
        match self.registry.send_to_room(&account.user_room(), &event).await {
            0 => {
                debug!(from = %from, account = %account, ?kind, "No live connection for account");
                Delivery::TargetGone
            }
            n => Delivery::Delivered(n),
        }
    }
}
