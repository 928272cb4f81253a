//! Validation for the `[server]` section.

use crate::schema::OmegaConfig;

use super::helpers::{validate_http_url, validate_range};

pub(crate) fn validate_server(errors: &mut Vec<String>, config: &OmegaConfig) {
    let server = &config.server;

    if server.port == 0 {
        errors.push("server.port must not be 0".into());
    }
    if server.host.trim().is_empty() {
        errors.push("server.host must not be empty".into());
    }
    validate_range(
        errors,
        "server.channel_capacity",
        u64::from(server.channel_capacity),
        1,
        65536,
    );
    validate_http_url(errors, "server.allowed_origin", server.allowed_origin.as_deref());
}
