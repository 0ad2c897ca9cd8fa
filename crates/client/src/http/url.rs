//! URL checks applied before any outbound request.

use coverfind_core::Error;

/// Error type for URL parsing failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

impl From<UrlError> for Error {
    fn from(err: UrlError) -> Self {
        Error::InvalidUrl(err.to_string())
    }
}

/// Parse an absolute http(s) URL.
///
/// Steps:
/// 1. Trim leading/trailing whitespace
/// 2. Require an explicit `http` or `https` scheme (`data:` and relative paths fail)
/// 3. Remove fragment (#...)
/// 4. Keep query string intact
pub fn parse_http_url(input: &str) -> Result<url::Url, UrlError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let mut parsed = url::Url::parse(trimmed).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(UrlError::InvalidUrl(format!("missing host: {trimmed}")));
    }

    parsed.set_fragment(None);

    Ok(parsed)
}

/// Rewrite a plain `http://` URL to `https://`.
pub fn upgrade_to_https(input: &str) -> String {
    match input.strip_prefix("http://") {
        Some(rest) => format!("https://{rest}"),
        None => input.to_string(),
    }
}

/// Whether `host` is `domain` or one of its subdomains.
pub fn host_matches(host: &str, domain: &str) -> bool {
    let host = host.to_ascii_lowercase();
    let domain = domain.trim_start_matches('.').to_ascii_lowercase();
    host == domain || host.ends_with(&format!(".{domain}"))
}
