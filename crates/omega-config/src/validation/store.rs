//! Validation for the `[store]` section.

use crate::schema::OmegaConfig;

use super::helpers::{validate_http_url, validate_range};

pub(crate) fn validate_store(errors: &mut Vec<String>, config: &OmegaConfig) {
    validate_range(errors, "store.timeout_secs", config.store.timeout_secs, 1, 300);
    validate_http_url(errors, "store.base_url", config.store.base_url.as_deref());
}
