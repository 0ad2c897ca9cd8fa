//! Ordered strategy cascade, first match wins.

use std::sync::Arc;
use std::time::Instant;

use crate::http::HttpTransport;
use crate::strategy::{CASCADE, Sources, Strategy};
use coverfind_core::{AppConfig, CoverRequest, CoverResult};

#[derive(Clone)]
pub struct CoverResolver {
    sources: Sources,
    cascade: Vec<Strategy>,
}

impl CoverResolver {
    pub fn new(sources: Sources, cascade: Vec<Strategy>) -> Self {
        Self { sources, cascade }
    }

    /// Full cascade minus `disabled_strategies`.
    pub fn from_config(http: Arc<dyn HttpTransport>, config: &AppConfig) -> Self {
        let cascade = CASCADE.into_iter().filter(|s| config.strategy_enabled(s.name())).collect();
        Self::new(Sources::from_config(http, config), cascade)
    }

    pub fn cascade(&self) -> &[Strategy] {
        &self.cascade
    }

    /// Run strategies in order and return the first cover URL with the strategy that found it.
    ///
    /// A failing strategy is logged and treated as no match.
    pub async fn resolve(&self, request: &CoverRequest) -> Option<(Strategy, String)> {
        for &strategy in &self.cascade {
            let start = Instant::now();
            match strategy.find(request, &self.sources).await {
                Ok(Some(url)) => {
                    tracing::info!(
                        title = %request.title,
                        strategy = strategy.name(),
                        cover_url = %url,
                        elapsed = ?start.elapsed(),
                        "cover found"
                    );
                    return Some((strategy, url));
                }
                Ok(None) => {
                    tracing::debug!(title = %request.title, strategy = strategy.name(), "no match");
                }
                Err(e) => {
                    tracing::warn!(title = %request.title, strategy = strategy.name(), error = %e, "strategy failed");
                }
            }
        }

        tracing::info!(title = %request.title, "no cover found");
        None
    }

    /// `resolve`, shaped as a [`CoverResult`]. Never fails; "not found" is an empty result.
    pub async fn search_cover(&self, request: &CoverRequest) -> CoverResult {
        let result = CoverResult::empty(request);
        match self.resolve(request).await {
            Some((_, url)) => result.with_cover_url(url),
            None => result,
        }
    }
}
