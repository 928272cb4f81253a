//! Dispatch tests: connection lifecycle through the hub without sockets.

use super::*;
use crate::presence::MemoryLiveStore;
use crate::protocol::{NoArgs, Relayed, SEARCHING};
use async_trait::async_trait;
use omega_common::{AccountId, StoreError};
use serde_json::json;

struct Client {
    id: ConnectionId,
    rx: mpsc::Receiver<String>,
}

impl Client {
    async fn connect(hub: &Hub) -> Self {
        let (id, mut rx) = hub.connect().await;
        let greeting: OutboundEvent = serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
        assert_eq!(
            greeting,
            OutboundEvent::Connected(Connected {
                connection_id: id.clone()
            })
        );
        Self { id, rx }
    }

    fn drain(&mut self) -> Vec<OutboundEvent> {
        let mut events = Vec::new();
        while let Ok(json) = self.rx.try_recv() {
            events.push(serde_json::from_str(&json).unwrap());
        }
        events
    }
}

fn hub_with(config: OmegaConfig) -> (Hub, MemoryLiveStore) {
    let store = MemoryLiveStore::new();
    let hub = Hub::new(&config, Arc::new(store.clone()));
    (hub, store)
}

fn hub() -> (Hub, MemoryLiveStore) {
    hub_with(OmegaConfig::default())
}

fn noisy_config() -> OmegaConfig {
    let mut config = OmegaConfig::default();
    config.server.notify_failures = true;
    config
}

#[tokio::test]
async fn lone_request_gets_single_searching_status() {
    let (hub, _store) = hub();
    let mut a = Client::connect(&hub).await;

    hub.handle_text(&a.id, r#"{"event":"request-pair"}"#).await;

    assert_eq!(a.drain(), vec![OutboundEvent::MatchStatus(SEARCHING.into())]);
    assert_eq!(hub.rendezvous().waiting().await, Some(a.id.clone()));
}

#[tokio::test]
async fn request_pair_with_empty_object_still_queues() {
    let (hub, _store) = hub();
    let mut a = Client::connect(&hub).await;

    hub.handle_text(&a.id, r#"{"event":"request-pair","data":{}}"#)
        .await;

    assert_eq!(a.drain(), vec![OutboundEvent::MatchStatus(SEARCHING.into())]);
    assert_eq!(hub.rendezvous().waiting().await, Some(a.id.clone()));
}

#[tokio::test]
async fn two_requests_pair_each_other() {
    let (hub, _store) = hub();
    let mut a = Client::connect(&hub).await;
    let mut b = Client::connect(&hub).await;

    hub.handle(&a.id, InboundEvent::RequestPair(NoArgs)).await;
    a.drain();
    hub.handle(&b.id, InboundEvent::RequestPair(NoArgs)).await;

    assert_eq!(a.drain(), vec![OutboundEvent::PartnerFound(b.id.clone())]);
    assert_eq!(b.drain(), vec![OutboundEvent::PartnerFound(a.id.clone())]);
    assert_eq!(hub.rendezvous().waiting().await, None);
}

#[tokio::test]
async fn waiter_disconnect_empties_slot() {
    let (hub, _store) = hub();
    let a = Client::connect(&hub).await;
    let mut b = Client::connect(&hub).await;

    hub.handle(&a.id, InboundEvent::RequestPair(NoArgs)).await;
    hub.disconnect(&a.id).await;
    assert_eq!(hub.rendezvous().waiting().await, None);

    hub.handle(&b.id, InboundEvent::RequestPair(NoArgs)).await;
    assert_eq!(b.drain(), vec![OutboundEvent::MatchStatus(SEARCHING.into())]);
    assert_eq!(hub.rendezvous().waiting().await, Some(b.id.clone()));
}

#[tokio::test]
async fn partner_is_told_when_the_other_side_leaves() {
    let (hub, _store) = hub();
    let a = Client::connect(&hub).await;
    let mut b = Client::connect(&hub).await;

    hub.handle(&a.id, InboundEvent::RequestPair(NoArgs)).await;
    hub.handle(&b.id, InboundEvent::RequestPair(NoArgs)).await;
    b.drain();

    hub.disconnect(&a.id).await;
    assert_eq!(b.drain(), vec![OutboundEvent::PartnerLeft(a.id.clone())]);
}

#[tokio::test]
async fn matched_offer_is_relayed_with_sender() {
    let (hub, _store) = hub();
    let a = Client::connect(&hub).await;
    let mut b = Client::connect(&hub).await;

    let frame = json!({
        "event": "offer-m",
        "data": { "payload": { "sdp": "v=0" }, "target": b.id },
    });
    hub.handle_text(&a.id, &frame.to_string()).await;

    assert_eq!(
        b.drain(),
        vec![OutboundEvent::OfferM(Relayed {
            payload: json!({ "sdp": "v=0" }),
            from: a.id.clone(),
        })]
    );
}

#[tokio::test]
async fn relay_to_departed_target_is_silent_by_default() {
    let (hub, _store) = hub();
    let mut a = Client::connect(&hub).await;
    let b = Client::connect(&hub).await;
    hub.disconnect(&b.id).await;

    let frame = json!({ "event": "ice-m", "data": { "payload": 1, "target": b.id } });
    hub.handle_text(&a.id, &frame.to_string()).await;

    assert!(a.drain().is_empty());
}

#[tokio::test]
async fn relay_to_departed_target_reports_when_enabled() {
    let (hub, _store) = hub_with(noisy_config());
    let mut a = Client::connect(&hub).await;

    let frame = json!({ "event": "answer-m", "data": { "payload": 1, "target": "gone" } });
    hub.handle_text(&a.id, &frame.to_string()).await;

    let events = a.drain();
    assert_eq!(events.len(), 1);
    assert!(matches!(
        &events[0],
        OutboundEvent::Error(ErrorNotice { message }) if message.starts_with("answer-m")
    ));
}

#[tokio::test]
async fn malformed_event_is_dropped_or_reported() {
    let (quiet, _store) = hub();
    let mut a = Client::connect(&quiet).await;
    quiet.handle_text(&a.id, "{not json").await;
    quiet.handle_text(&a.id, r#"{"event":"offer-m","data":{}}"#).await;
    assert!(a.drain().is_empty());

    let (noisy, _store) = hub_with(noisy_config());
    let mut b = Client::connect(&noisy).await;
    noisy.handle_text(&b.id, "{not json").await;
    assert!(matches!(b.drain().as_slice(), [OutboundEvent::Error(_)]));
}

#[tokio::test]
async fn enforced_pairing_rejects_strangers() {
    let mut config = noisy_config();
    config.rendezvous.enforce_pairing = true;
    let (hub, _store) = hub_with(config);
    let mut a = Client::connect(&hub).await;
    let mut b = Client::connect(&hub).await;

    hub.handle(
        &a.id,
        InboundEvent::OfferM(PairSignal {
            payload: json!("sdp"),
            target: b.id.clone(),
        }),
    )
    .await;

    assert!(b.drain().is_empty());
    assert!(matches!(
        a.drain().as_slice(),
        [OutboundEvent::Error(ErrorNotice { message })] if message.contains("not your partner")
    ));
}

#[tokio::test]
async fn go_live_then_disconnect_toggles_flag() {
    let (hub, store) = hub();
    let a = Client::connect(&hub).await;
    let account = AccountId::from("64f0c2");

    hub.handle_text(&a.id, r#"{"event":"go-live","data":"64f0c2"}"#)
        .await;
    hub.presence().flush().await;
    assert_eq!(store.is_live(&account).await, Some(true));

    hub.disconnect(&a.id).await;
    hub.presence().flush().await;
    assert_eq!(store.is_live(&account).await, Some(false));
    assert_eq!(hub.registry().room_size(&account.user_room()).await, 0);
}

#[tokio::test]
async fn direct_offer_reaches_live_account() {
    let (hub, _store) = hub();
    let mut streamer = Client::connect(&hub).await;
    let viewer = Client::connect(&hub).await;

    hub.handle(&streamer.id, InboundEvent::GoLive(AccountId::from("s1")))
        .await;
    hub.handle(
        &viewer.id,
        InboundEvent::Offer(DirectSignal {
            payload: json!({ "sdp": "x" }),
            target_account_id: AccountId::from("s1"),
        }),
    )
    .await;

    assert_eq!(
        streamer.drain(),
        vec![OutboundEvent::Offer(Relayed {
            payload: json!({ "sdp": "x" }),
            from: viewer.id.clone(),
        })]
    );
}

#[tokio::test]
async fn join_stream_notifies_streamer_and_joins_room() {
    let (hub, _store) = hub();
    let mut streamer = Client::connect(&hub).await;
    let viewer = Client::connect(&hub).await;
    let target = AccountId::from("s1");

    hub.handle(&streamer.id, InboundEvent::GoLive(target.clone()))
        .await;
    hub.handle(
        &viewer.id,
        InboundEvent::JoinStream(JoinStream {
            account_id: AccountId::from("v1"),
            target_account_id: target.clone(),
        }),
    )
    .await;

    assert_eq!(
        streamer.drain(),
        vec![OutboundEvent::ViewerJoined(ViewerJoined {
            account_id: AccountId::from("v1"),
        })]
    );
    assert_eq!(hub.registry().room_size(&target.stream_room()).await, 1);
}

struct DownStore;

#[async_trait]
impl LiveStatusStore for DownStore {
    async fn set_live(&self, _account: &AccountId, _live: bool) -> Result<(), StoreError> {
        Err(StoreError::Http("connection refused".into()))
    }
}

#[tokio::test]
async fn store_outage_does_not_block_slot_release() {
    let hub = Hub::new(&OmegaConfig::default(), Arc::new(DownStore));
    let a = Client::connect(&hub).await;

    hub.handle(&a.id, InboundEvent::GoLive(AccountId::from("u1")))
        .await;
    hub.handle(&a.id, InboundEvent::RequestPair(NoArgs)).await;
    hub.disconnect(&a.id).await;

    assert_eq!(hub.rendezvous().waiting().await, None);
    assert!(!hub.registry().is_connected(&a.id).await);
    assert_eq!(hub.registry().count().await, 0);
}
