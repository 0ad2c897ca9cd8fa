//! Volumes metadata API client.
//!
//! `GET {api_url}?q=<query>&maxResults=<n>&fields=items(volumeInfo(imageLinks))`;
//! the cover is `items[].volumeInfo.imageLinks.thumbnail`.

pub mod response;

pub use response::VolumesResponse;

use std::sync::Arc;

use crate::http::HttpTransport;
use coverfind_core::{AppConfig, Error};

const MAX_RESULTS: u8 = 5;
const FIELDS: &str = "items(volumeInfo(imageLinks))";

#[derive(Debug, Clone)]
pub struct VolumesConfig {
    pub api_url: String,
    pub api_key: Option<String>,
}

impl VolumesConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self { api_url: config.volumes_api_url.clone(), api_key: config.volumes_api_key.clone() }
    }
}

fn clean(value: &str) -> String {
    value.replace('"', "").trim().to_string()
}

/// `intitle:"<title>" inauthor:"<author>"`
pub fn exact_query(title: &str, author: Option<&str>) -> String {
    match author {
        Some(author) => format!("intitle:\"{}\" inauthor:\"{}\"", clean(title), clean(author)),
        None => format!("intitle:\"{}\"", clean(title)),
    }
}

/// `<title> <author>`
pub fn loose_query(title: &str, author: Option<&str>) -> String {
    match author {
        Some(author) => format!("{} {}", clean(title), clean(author)),
        None => clean(title),
    }
}

#[derive(Clone)]
pub struct VolumesClient {
    http: Arc<dyn HttpTransport>,
    config: VolumesConfig,
}

impl VolumesClient {
    pub fn new(http: Arc<dyn HttpTransport>, config: VolumesConfig) -> Self {
        Self { http, config }
    }

    fn url(&self, q: &str) -> Result<String, Error> {
        let max = MAX_RESULTS.to_string();
        let mut params = vec![("q", q), ("maxResults", max.as_str()), ("fields", FIELDS)];
        if let Some(key) = self.config.api_key.as_deref() {
            params.push(("key", key));
        }

        url::Url::parse_with_params(&self.config.api_url, &params)
            .map(String::from)
            .map_err(|e| Error::InvalidUrl(format!("{}: {e}", self.config.api_url)))
    }

    /// Thumbnail for a raw query string.
    pub async fn thumbnail(&self, q: &str) -> Result<Option<String>, Error> {
        if q.trim().is_empty() {
            return Err(Error::InvalidInput("volumes query cannot be empty".to_string()));
        }

        tracing::debug!(q, "querying volumes API");

        let body = self.http.fetch(&self.url(q)?, None).await?;
        let response: VolumesResponse =
            serde_json::from_str(&body).map_err(|e| Error::Parse(format!("volumes response: {e}")))?;

        Ok(response.first_thumbnail())
    }

    /// Exact title/author query, then the looser keyword form.
    ///
    /// A failed exact query still falls through to the loose one; only the
    /// loose query's failure is returned.
    pub async fn find_cover(&self, title: &str, author: Option<&str>) -> Result<Option<String>, Error> {
        match self.thumbnail(&exact_query(title, author)).await {
            Ok(Some(url)) => return Ok(Some(url)),
            Ok(None) => {}
            Err(e) => tracing::debug!(error = %e, "exact volumes query failed"),
        }

        self.thumbnail(&loose_query(title, author)).await
    }
}
