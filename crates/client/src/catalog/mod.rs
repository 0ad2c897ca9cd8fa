//! Bibliographic catalog client.
//!
//! ### Endpoints
//!
//! - **Search**: `GET {search_url}?q=<query>&limit=<n>&fields=<list>`, JSON with a `docs` array.
//! - **Cover by id**: `{cover_id_url}/{cover_i}-M.jpg`
//! - **Cover by ISBN**: `{cover_isbn_url}/{isbn}-M.jpg?default=false` (404 instead of a
//!   blank placeholder when no cover exists; still probe first)

pub mod request;
pub mod response;

pub use request::{COVER_FIELDS, CatalogQuery, ISBN_FIELDS};
pub use response::{CatalogDoc, CatalogResponse};

use std::sync::Arc;
use std::time::Instant;

use crate::http::HttpTransport;
use coverfind_core::{AppConfig, Error};

/// Catalog endpoints.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub search_url: String,
    pub cover_id_url: String,
    pub cover_isbn_url: String,
}

impl CatalogConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            search_url: config.catalog_search_url.clone(),
            cover_id_url: config.cover_id_url.trim_end_matches('/').to_string(),
            cover_isbn_url: config.cover_isbn_url.trim_end_matches('/').to_string(),
        }
    }
}

/// Catalog search client.
#[derive(Clone)]
pub struct CatalogClient {
    http: Arc<dyn HttpTransport>,
    config: CatalogConfig,
}

impl CatalogClient {
    pub fn new(http: Arc<dyn HttpTransport>, config: CatalogConfig) -> Self {
        Self { http, config }
    }

    /// Run one search.
    pub async fn search(&self, query: &CatalogQuery) -> Result<CatalogResponse, Error> {
        query.validate()?;

        let start = Instant::now();
        let url = query.to_url(&self.config.search_url)?;

        tracing::debug!(q = %query.q, limit = query.limit, "searching catalog");

        let body = self.http.fetch(&url, None).await?;
        let response: CatalogResponse =
            serde_json::from_str(&body).map_err(|e| Error::Parse(format!("catalog response: {e}")))?;

        tracing::debug!(docs = response.docs.len(), elapsed = ?start.elapsed(), "catalog search completed");

        Ok(response)
    }

    /// Cover URL of the first matching doc that carries a cover id.
    pub async fn find_cover(&self, query: &CatalogQuery) -> Result<Option<String>, Error> {
        let response = self.search(query).await?;
        Ok(response.first_cover_id().map(|id| self.cover_url(id)))
    }

    pub fn cover_url(&self, cover_id: i64) -> String {
        format!("{}/{}-M.jpg", self.config.cover_id_url, cover_id)
    }

    pub fn isbn_cover_url(&self, isbn: &str) -> String {
        format!("{}/{}-M.jpg?default=false", self.config.cover_isbn_url, isbn)
    }
}
