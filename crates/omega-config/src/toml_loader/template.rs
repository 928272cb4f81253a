//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Omega Connect signaling server
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[server]
# host = "0.0.0.0"
# port = 5000
# allowed_origin = "http://localhost:3000"
# channel_capacity = 256    # 1-65536
# notify_failures = false   # send "error" events for dropped messages

[rendezvous]
# enforce_pairing = false   # only relay offer-m/answer-m/ice-m between matched peers

[store]
# base_url = "http://localhost:5001/internal"
# api_key = ""
# timeout_secs = 10         # 1-300

[logging]
# level = "info"            # trace, debug, info, warn, error
"##
    .to_string()
}
