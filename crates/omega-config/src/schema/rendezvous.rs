use serde::{Deserialize, Serialize};

/// Random-stranger pairing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct RendezvousConfig {
    /// Refuse matched-pair relays between connections that were not paired.
    pub enforce_pairing: bool,
}
