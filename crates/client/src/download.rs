//! Turns an accepted cover URL into a stored file.
//!
//! The deterministic filename is the dedup key: when it already exists no
//! request is made. A failed download is logged and the result is returned
//! without `local_path`; it never surfaces as an error.

use std::sync::Arc;

use crate::http::HttpTransport;
use coverfind_core::storage::cover_filename;
use coverfind_core::{CoverResult, CoverStore, Error};

#[derive(Clone)]
pub struct CoverDownloader {
    http: Arc<dyn HttpTransport>,
    store: CoverStore,
}

impl CoverDownloader {
    pub fn new(http: Arc<dyn HttpTransport>, store: CoverStore) -> Self {
        Self { http, store }
    }

    pub fn store(&self) -> &CoverStore {
        &self.store
    }

    /// Store the cover behind `result.cover_url`, annotating `local_path`.
    pub async fn materialize(&self, result: CoverResult) -> CoverResult {
        let Some(url) = result.cover_url.clone() else {
            return result;
        };

        match self.store_cover(&result, &url).await {
            Ok(public_path) => result.with_local_path(public_path),
            Err(e) => {
                tracing::warn!(title = %result.title, cover_url = %url, error = %e, "cover download failed");
                result
            }
        }
    }

    async fn store_cover(&self, result: &CoverResult, url: &str) -> Result<String, Error> {
        self.store.ensure_dir().await?;

        let filename = cover_filename(&result.title, result.request().primary_author());
        if let Some(existing) = self.store.existing(&filename).await {
            tracing::debug!(filename, "cover already stored");
            return Ok(existing);
        }

        self.http.download(url, &self.store.path_for(&filename)).await?;
        tracing::info!(filename, cover_url = %url, "cover stored");

        Ok(self.store.public_path(&filename))
    }
}
