//! Configuration schema types for Omega Connect.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod logging;
mod rendezvous;
mod server;
mod store;

pub use logging::*;
pub use rendezvous::*;
pub use server::*;
pub use store::*;

use serde::{Deserialize, Serialize};

/// Root configuration for the signaling server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct OmegaConfig {
    pub server: ServerConfig,
    pub rendezvous: RendezvousConfig,
    pub store: StoreConfig,
    pub logging: LoggingConfig,
}
