//! Realtime channel wire protocol.
//!
//! Every text frame is `{"event": "<name>", "data": <payload>}`. Signaling
//! payloads are carried as opaque JSON and never inspected.

use omega_common::{AccountId, ConnectionId};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Status text sent to a connection that starts waiting for a partner.
pub const SEARCHING: &str = "Searching...";

/// Events a client sends to the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum InboundEvent {
    GoLive(AccountId),
    JoinStream(JoinStream),
    RequestPair(NoArgs),
    Offer(DirectSignal),
    Answer(DirectSignal),
    IceCandidate(DirectSignal),
    OfferM(PairSignal),
    AnswerM(PairSignal),
    IceM(PairSignal),
}

impl InboundEvent {
    pub fn name(&self) -> &'static str {
        match self {
            InboundEvent::GoLive(_) => "go-live",
            InboundEvent::JoinStream(_) => "join-stream",
            InboundEvent::RequestPair(_) => "request-pair",
            InboundEvent::Offer(_) => "offer",
            InboundEvent::Answer(_) => "answer",
            InboundEvent::IceCandidate(_) => "ice-candidate",
            InboundEvent::OfferM(_) => "offer-m",
            InboundEvent::AnswerM(_) => "answer-m",
            InboundEvent::IceM(_) => "ice-m",
        }
    }
}

/// Data of an event that takes no arguments. Whatever the client sends,
/// including nothing at all, is accepted and ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NoArgs;

impl<'de> Deserialize<'de> for NoArgs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<IgnoredAny>::deserialize(deserializer).map(|_| NoArgs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinStream {
    pub account_id: AccountId,
    pub target_account_id: AccountId,
}

/// Signal addressed to whichever connections went live as an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectSignal {
    #[serde(default)]
    pub payload: Value,
    pub target_account_id: AccountId,
}

/// Signal addressed to a single connection, normally a matched partner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairSignal {
    #[serde(default)]
    pub payload: Value,
    pub target: ConnectionId,
}

/// Events the server sends to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum OutboundEvent {
    Connected(Connected),
    MatchStatus(String),
    PartnerFound(ConnectionId),
    PartnerLeft(ConnectionId),
    ViewerJoined(ViewerJoined),
    Offer(Relayed),
    Answer(Relayed),
    IceCandidate(Relayed),
    OfferM(Relayed),
    AnswerM(Relayed),
    IceM(Relayed),
    Error(ErrorNotice),
}

impl OutboundEvent {
    pub fn to_json(&self) -> String {
        // Only owned enum/struct/string data; serialization cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connected {
    pub connection_id: ConnectionId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerJoined {
    pub account_id: AccountId,
}

/// A forwarded signaling payload and the connection it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relayed {
    pub payload: Value,
    pub from: ConnectionId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorNotice {
    pub message: String,
}

/// Session negotiation step being relayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    Offer,
    Answer,
    IceCandidate,
}

impl SignalKind {
    /// Event used when the signal was addressed to an account room.
    pub fn direct(self, relayed: Relayed) -> OutboundEvent {
        match self {
            SignalKind::Offer => OutboundEvent::Offer(relayed),
            SignalKind::Answer => OutboundEvent::Answer(relayed),
            SignalKind::IceCandidate => OutboundEvent::IceCandidate(relayed),
        }
    }

    /// Event used when the signal was addressed to a matched partner.
    pub fn matched(self, relayed: Relayed) -> OutboundEvent {
        match self {
            SignalKind::Offer => OutboundEvent::OfferM(relayed),
            SignalKind::Answer => OutboundEvent::AnswerM(relayed),
            SignalKind::IceCandidate => OutboundEvent::IceM(relayed),
        }
    }
}
