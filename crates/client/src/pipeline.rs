//! Resolver, downloader and store wired together from one [`AppConfig`].

use std::collections::HashSet;
use std::sync::Arc;

use crate::download::CoverDownloader;
use crate::http::{HttpTransport, ReqwestTransport, TransportConfig};
use crate::resolver::CoverResolver;
use coverfind_core::{AppConfig, CoverRequest, CoverResult, CoverStore, Error};

#[derive(Clone)]
pub struct CoverPipeline {
    resolver: CoverResolver,
    downloader: CoverDownloader,
}

impl CoverPipeline {
    /// Pipeline over the real network.
    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let transport = ReqwestTransport::new(TransportConfig::from_app_config(config))?;
        Ok(Self::with_transport(Arc::new(transport), config))
    }

    /// Pipeline over any transport.
    pub fn with_transport(http: Arc<dyn HttpTransport>, config: &AppConfig) -> Self {
        Self {
            resolver: CoverResolver::from_config(http.clone(), config),
            downloader: CoverDownloader::new(http, CoverStore::from_config(config)),
        }
    }

    pub fn resolver(&self) -> &CoverResolver {
        &self.resolver
    }

    pub fn store(&self) -> &CoverStore {
        self.downloader.store()
    }

    /// Find a cover URL. Nothing is written.
    pub async fn search_cover(&self, request: &CoverRequest) -> CoverResult {
        self.resolver.search_cover(request).await
    }

    /// Store the cover behind an already resolved result.
    pub async fn materialize(&self, result: CoverResult) -> CoverResult {
        self.downloader.materialize(result).await
    }

    /// `search_cover` then `materialize`.
    pub async fn resolve_and_store(&self, request: &CoverRequest) -> CoverResult {
        let result = self.search_cover(request).await;
        self.materialize(result).await
    }

    /// Delete stored covers no longer referenced by any book record.
    pub async fn cleanup_orphans(&self, referenced: &HashSet<String>) -> Result<usize, Error> {
        let removed = self.store().remove_orphans(referenced).await?;
        tracing::info!(removed, dir = %self.store().root().display(), "orphaned covers removed");
        Ok(removed)
    }
}
