//! Shared range-validation helpers used by all section validators.

/// Push an error if `value` is outside `[min, max]`.
pub(crate) fn validate_range(errors: &mut Vec<String>, name: &str, value: u64, min: u64, max: u64) {
    if value < min || value > max {
        errors.push(format!("{name} = {value} is out of range [{min}, {max}]"));
    }
}

/// Push an error if `value` is present but does not look like an HTTP(S) URL.
pub(crate) fn validate_http_url(errors: &mut Vec<String>, name: &str, value: Option<&str>) {
    if let Some(url) = value {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            errors.push(format!("{name} = {url:?} must start with http:// or https://"));
        }
    }
}
