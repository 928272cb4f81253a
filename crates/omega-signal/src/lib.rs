//! omega-signal: realtime core for Omega Connect.
//!
//! One WebSocket per client. Clients can flag their account live, ask the
//! rendezvous queue for a random partner, and exchange WebRTC offers,
//! answers and ICE candidates through the server. Media never passes
//! through here; only the small JSON signaling frames do.

pub mod connection;
pub mod hub;
pub mod logging;
pub mod presence;
pub mod protocol;
pub mod registry;
pub mod relay;
pub mod rendezvous;
pub mod server;

pub use hub::Hub;
pub use presence::{
    store_from_config, HttpLiveStore, LiveStatusStore, MemoryLiveStore, PresenceTracker,
};
pub use protocol::{InboundEvent, NoArgs, OutboundEvent, SignalKind, SEARCHING};
pub use registry::Registry;
pub use relay::{Delivery, SignalRelay};
pub use rendezvous::{PairOutcome, Rendezvous};
pub use server::{shutdown_signal, Server};
