//! URL syntax validation gating the Analyze action.
//!
//! A URL is accepted when it parses as an absolute URL with a non-empty
//! scheme and a non-empty host. No normalization is applied and no scheme
//! allow-list exists beyond what `url::Url` itself accepts.

use url::Url;

use crate::client::FetchError;

/// Returns `true` if `input` is an absolute URL with a scheme and a host.
pub fn is_valid_url(input: &str) -> bool {
    validate_url(input).is_ok()
}

/// Parse `input` into a [`Url`], or return the inline message shown to the
/// user when the Analyze action is blocked.
pub fn validate_url(input: &str) -> Result<Url, FetchError> {
    if input.is_empty() {
        return Err(FetchError::InvalidUrl("Please enter a URL".to_string()));
    }

    let parsed = Url::parse(input)
        .map_err(|e| FetchError::InvalidUrl(format!("Invalid URL: {e}")))?;

    if parsed.scheme().is_empty() {
        return Err(FetchError::InvalidUrl(
            "Invalid URL: missing scheme".to_string(),
        ));
    }

    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(parsed),
        _ => Err(FetchError::InvalidUrl(
            "Invalid URL: missing host".to_string(),
        )),
    }
}
