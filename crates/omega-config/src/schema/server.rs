use serde::{Deserialize, Serialize};

/// Realtime channel listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// When set, WebSocket handshakes from any other `Origin` are refused.
    pub allowed_origin: Option<String>,
    /// Outbound queue depth per connection (valid range: 1-65536).
    pub channel_capacity: u32,
    /// Send an `error` event back on dropped or malformed events.
    pub notify_failures: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 5000,
            allowed_origin: None,
            channel_capacity: 256,
            notify_failures: false,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
