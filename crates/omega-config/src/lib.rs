//! Omega Connect configuration.
//!
//! TOML-based configuration for the signaling server. Every section uses
//! serde defaults, so an empty file (or no file at all) yields a server
//! that listens on port 5000 with an in-memory presence store.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use omega_config::load_config;
//!
//! let config = load_config(None, Some(8080)).expect("failed to load config");
//! println!("listening on {}", config.server.bind_addr());
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{
    LogLevel, LoggingConfig, OmegaConfig, RendezvousConfig, ServerConfig, StoreConfig,
};

use std::path::Path;

use omega_common::ConfigError;

/// Load config from `path`, or the platform default when `None`.
///
/// `port` overrides `server.port` before the result is validated.
pub fn load_config(path: Option<&Path>, port: Option<u16>) -> Result<OmegaConfig, ConfigError> {
    let mut config = match path {
        Some(path) => toml_loader::load_from_path(path)?,
        None => toml_loader::load_default()?,
    };
    if let Some(port) = port {
        config.server.port = port;
    }
    validation::validate(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn explicit_path_is_loaded_and_validated() {
        let file = write_config("[server]\nport = 7000\n\n[rendezvous]\nenforce_pairing = true\n");
        let config = load_config(Some(file.path()), None).unwrap();
        assert_eq!(config.server.port, 7000);
        assert!(config.rendezvous.enforce_pairing);
    }

    #[test]
    fn port_override_wins_over_file() {
        let file = write_config("[server]\nport = 7000\n");
        let config = load_config(Some(file.path()), Some(9100)).unwrap();
        assert_eq!(config.server.port, 9100);
    }

    #[test]
    fn port_override_is_validated() {
        let file = write_config("");
        let err = load_config(Some(file.path()), Some(0)).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(ref msg) if msg.contains("port")));
    }

    #[test]
    fn invalid_file_is_rejected() {
        let file = write_config("[server]\nchannel_capacity = 0\n");
        assert!(matches!(
            load_config(Some(file.path()), None),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn missing_explicit_path_is_not_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(matches!(
            load_config(Some(&path), None),
            Err(ConfigError::FileNotFound(_))
        ));
        assert!(!path.exists());
    }
}
