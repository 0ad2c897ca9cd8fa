//! Outbound HTTP for cover sources.
//!
//! ### Operations
//! - `fetch`: one GET, body as text. Status must be 200. No retries.
//! - `download`: GET streamed to disk. 301/302 are followed by hand against
//!   `Location` (up to [`MAX_DOWNLOAD_HOPS`]); the body lands in `<dest>.part`
//!   and is renamed into place only once complete.
//! - `validate`: GET whose body is never read. Passes on status 200/302 with
//!   an `image/*` content type.
//!
//! ### Timeouts
//! - 10s for API calls, 15s for header-carrying scrape calls
//! - 15s per download hop, 5s per validation probe
//!
//! All of it sits behind [`HttpTransport`] so the pipeline can run against a
//! scripted fake.

#[cfg(test)]
pub(crate) mod fake;
pub mod url;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, header};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::io::AsyncWriteExt;

pub use url::{UrlError, host_matches, parse_http_url, upgrade_to_https};

use coverfind_core::{AppConfig, Error};

/// Redirect hops `download` follows before giving up.
pub const MAX_DOWNLOAD_HOPS: usize = 3;

/// The network capabilities a cover lookup needs.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// GET `url` and return the body. Custom headers mark a scrape call.
    async fn fetch(&self, url: &str, headers: Option<&header::HeaderMap>) -> Result<String, Error>;

    /// Stream `url` into `dest`.
    async fn download(&self, url: &str, dest: &Path) -> Result<(), Error>;

    /// Confirm `url` serves an image without downloading it.
    async fn validate(&self, url: &str) -> Result<(), Error>;
}

/// Configuration for the reqwest transport.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// User agent string (default: "coverfind/0.1")
    pub user_agent: String,

    /// Timeout for API calls without custom headers (default: 10s)
    pub search_timeout: Duration,

    /// Timeout for scrape calls carrying custom headers (default: 15s)
    pub scrape_timeout: Duration,

    /// Timeout for each download hop (default: 15s)
    pub download_timeout: Duration,

    /// Timeout for an image probe (default: 5s)
    pub validate_timeout: Duration,

    /// Redirects followed automatically by `fetch` and `validate` (default: 5)
    pub max_redirects: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self::from_app_config(&AppConfig::default())
    }
}

impl TransportConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            search_timeout: config.search_timeout(),
            scrape_timeout: config.scrape_timeout(),
            download_timeout: config.download_timeout(),
            validate_timeout: config.validate_timeout(),
            max_redirects: 5,
        }
    }
}

/// Map a reqwest failure onto the error taxonomy.
fn transport_error(err: reqwest::Error, url: &str) -> Error {
    if err.is_timeout() {
        Error::Timeout(format!("{url}: {err}"))
    } else if err.is_decode() {
        Error::Parse(format!("{url}: {err}"))
    } else {
        Error::Network(format!("{url}: {err}"))
    }
}

fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".part");
    dest.with_file_name(name)
}

/// reqwest-backed transport.
pub struct ReqwestTransport {
    http: Client,
    no_redirect: Client,
    config: TransportConfig,
}

impl ReqwestTransport {
    /// Create a new transport with the given configuration.
    pub fn new(config: TransportConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::Network(format!("failed to build HTTP client: {e}")))?;

        let no_redirect = Client::builder()
            .user_agent(&config.user_agent)
            .redirect(reqwest::redirect::Policy::none())
            .use_rustls_tls()
            .build()
            .map_err(|e| Error::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, no_redirect, config })
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    async fn write_body(&self, mut response: reqwest::Response, url: &str, dest: &Path) -> Result<u64, Error> {
        let mut file = tokio::fs::File::create(dest).await?;
        let mut written = 0u64;

        while let Some(chunk) = response.chunk().await.map_err(|e| transport_error(e, url))? {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        Ok(written)
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn fetch(&self, url_str: &str, headers: Option<&header::HeaderMap>) -> Result<String, Error> {
        let start = Instant::now();
        let url = parse_http_url(url_str)?;

        let timeout = if headers.is_some() { self.config.scrape_timeout } else { self.config.search_timeout };

        let mut request = self.http.get(url.clone()).timeout(timeout);
        if let Some(headers) = headers {
            request = request.headers(headers.clone());
        }

        let response = request.send().await.map_err(|e| transport_error(e, url_str))?;
        let status = response.status();

        if status != StatusCode::OK {
            return Err(Error::HttpStatus { status: status.as_u16(), url: url_str.to_string() });
        }

        let body = response.text().await.map_err(|e| transport_error(e, url_str))?;

        tracing::debug!(url = %url, status = status.as_u16(), elapsed_ms = start.elapsed().as_millis() as u64, bytes = body.len(), "fetched");

        Ok(body)
    }

    async fn download(&self, url_str: &str, dest: &Path) -> Result<(), Error> {
        let mut current = parse_http_url(url_str)?;
        let mut hops = 0;

        loop {
            let response = self
                .no_redirect
                .get(current.clone())
                .timeout(self.config.download_timeout)
                .send()
                .await
                .map_err(|e| transport_error(e, current.as_str()))?;

            let status = response.status();
            match status {
                StatusCode::MOVED_PERMANENTLY | StatusCode::FOUND => {
                    let location = response
                        .headers()
                        .get(header::LOCATION)
                        .and_then(|v| v.to_str().ok())
                        .ok_or_else(|| Error::HttpStatus { status: status.as_u16(), url: current.to_string() })?;

                    if hops >= MAX_DOWNLOAD_HOPS {
                        return Err(Error::HttpStatus { status: status.as_u16(), url: current.to_string() });
                    }

                    let next = current
                        .join(location)
                        .map_err(|e| Error::InvalidUrl(format!("bad redirect {location}: {e}")))?;
                    tracing::debug!(from = %current, to = %next, "following download redirect");
                    current = next;
                    hops += 1;
                }
                StatusCode::OK => {
                    let part = part_path(dest);
                    let outcome = self.write_body(response, current.as_str(), &part).await;

                    return match outcome {
                        Ok(0) => {
                            let _ = tokio::fs::remove_file(&part).await;
                            Err(Error::Validation(format!("{current}: empty body")))
                        }
                        Ok(bytes) => {
                            tokio::fs::rename(&part, dest).await?;
                            tracing::debug!(url = %current, dest = %dest.display(), bytes, "downloaded");
                            Ok(())
                        }
                        Err(e) => {
                            let _ = tokio::fs::remove_file(&part).await;
                            Err(e)
                        }
                    };
                }
                other => {
                    return Err(Error::HttpStatus { status: other.as_u16(), url: current.to_string() });
                }
            }
        }
    }

    async fn validate(&self, url_str: &str) -> Result<(), Error> {
        let url = parse_http_url(url_str)?;

        let response = self
            .http
            .get(url)
            .timeout(self.config.validate_timeout)
            .send()
            .await
            .map_err(|e| transport_error(e, url_str))?;

        let status = response.status();
        if status != StatusCode::OK && status != StatusCode::FOUND {
            return Err(Error::HttpStatus { status: status.as_u16(), url: url_str.to_string() });
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        if content_type.starts_with("image/") {
            Ok(())
        } else {
            Err(Error::Validation(format!("{url_str}: content-type {content_type:?}")))
        }
    }
}
