//! Subscriber setup.
//!
//! The configured level is unknown until the config file is read, so the
//! file is loaded under a scoped default-level subscriber and the global
//! one is installed afterwards.

use std::path::Path;

use omega_common::ConfigError;
use omega_config::{load_config, LoggingConfig, OmegaConfig};
use tracing::Subscriber;
use tracing_subscriber::EnvFilter;

/// `RUST_LOG` when set, otherwise the configured level for our crates.
pub fn env_filter(logging: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| logging.filter_directive().into())
}

/// Subscriber used while loading config.
pub fn bootstrap_subscriber() -> impl Subscriber + Send + Sync + 'static {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(&LoggingConfig::default()))
        .finish()
}

/// Load config with `subscriber` active, so the loader's own messages
/// (default file created, validation warnings) are not lost.
pub fn load_config_logged<S>(
    subscriber: S,
    path: Option<&Path>,
    port: Option<u16>,
) -> Result<OmegaConfig, ConfigError>
where
    S: Subscriber + Send + Sync + 'static,
{
    tracing::subscriber::with_default(subscriber, || load_config(path, port))
}

/// Install the process-wide subscriber.
pub fn init(logging: &LoggingConfig) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(logging))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    fn capturing(captured: &Captured) -> impl Subscriber + Send + Sync + 'static {
        let writer = captured.clone();
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish()
    }

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loader_messages_reach_the_bootstrap_subscriber() {
        let captured = Captured::default();
        let file = write_config("[server]\nport = 7000\n");

        let config = load_config_logged(capturing(&captured), Some(file.path()), None).unwrap();

        assert_eq!(config.server.port, 7000);
        assert!(captured.text().contains("loaded config from"));
    }

    #[test]
    fn validation_warning_is_logged_before_the_error() {
        let captured = Captured::default();
        let file = write_config("[server]\nchannel_capacity = 0\n");

        let err = load_config_logged(capturing(&captured), Some(file.path()), None).unwrap_err();

        assert!(matches!(err, ConfigError::ValidationError(_)));
        let text = captured.text();
        assert!(text.contains("WARN"));
        assert!(text.contains("config validation warning"));
    }

    #[test]
    fn configured_level_scopes_the_filter_to_our_crates() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let logging = LoggingConfig {
            level: omega_config::LogLevel::Debug,
        };
        let filter = env_filter(&logging).to_string();
        assert!(filter.contains("omega_signal=debug"));
        assert!(filter.contains("omega_config=debug"));
    }
}
