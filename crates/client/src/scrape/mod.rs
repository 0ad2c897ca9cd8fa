//! Image-search scrape source.
//!
//! Last resort in the cascade. Fetches a result page with a browser-like
//! header set and pulls candidate image URLs out of the markup. The page
//! format is not under our control, so everything here is best effort.
//!
//! ### Pipeline
//! - [`queries`]: quoted and unquoted "book cover" query strings
//! - [`images::extract_image_urls`]: `<img>` attributes plus quoted URLs
//! - [`images::filter_candidates`]: drop the engine's own hosts, `data:` URIs, overlong URLs
//! - [`images::rank_candidates`]: cover-ish URLs first

pub mod images;

pub use images::{extract_image_urls, filter_candidates, rank_candidates};

use reqwest::header::{self, HeaderMap, HeaderValue};
use std::sync::Arc;

use crate::http::HttpTransport;
use coverfind_core::{AppConfig, Error};

const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0 Safari/537.36";

/// Header set that makes the result page render like it would for a browser.
pub fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(
        header::ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"),
    );
    headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(header::UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
    headers
}

/// Query strings to try, most specific first.
pub fn queries(title: &str, author: Option<&str>) -> Vec<String> {
    let title = title.replace('"', "");
    let title = title.trim();
    let mut out = Vec::new();

    match author.map(|a| a.replace('"', "")).filter(|a| !a.trim().is_empty()) {
        Some(author) => {
            let author = author.trim();
            out.push(format!("\"{title}\" \"{author}\" book cover"));
            out.push(format!("{title} {author} book cover"));
            out.push(format!("\"{title}\" book cover"));
        }
        None => {
            out.push(format!("\"{title}\" book cover"));
            out.push(format!("{title} book cover"));
        }
    }

    out.dedup();
    out
}

/// Scraped image search.
#[derive(Clone)]
pub struct ImageSearch {
    http: Arc<dyn HttpTransport>,
    search_url: String,
    ignored_hosts: Vec<String>,
}

impl ImageSearch {
    pub fn new(http: Arc<dyn HttpTransport>, search_url: impl Into<String>, ignored_hosts: Vec<String>) -> Self {
        Self { http, search_url: search_url.into(), ignored_hosts }
    }

    pub fn from_config(http: Arc<dyn HttpTransport>, config: &AppConfig) -> Self {
        Self::new(http, config.image_search_url.clone(), config.ignored_image_hosts.clone())
    }

    fn url(&self, query: &str) -> Result<String, Error> {
        url::Url::parse_with_params(&self.search_url, &[("q", query)])
            .map(String::from)
            .map_err(|e| Error::InvalidUrl(format!("{}: {e}", self.search_url)))
    }

    /// Ranked candidate image URLs for one query. Not validated.
    pub async fn candidates(&self, query: &str) -> Result<Vec<String>, Error> {
        let headers = browser_headers();
        let html = self.http.fetch(&self.url(query)?, Some(&headers)).await?;

        let found = extract_image_urls(&html);
        let total = found.len();
        let ranked = rank_candidates(filter_candidates(found, &self.ignored_hosts));

        tracing::debug!(query, total, kept = ranked.len(), "image search candidates");

        Ok(ranked)
    }
}
