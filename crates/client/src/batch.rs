//! Sequential batch over the pipeline.
//!
//! Items run one at a time in input order with a fixed pause between them.
//! Each item runs on its own task, so a panic while resolving one book
//! becomes that book's bare result instead of ending the batch.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use crate::pipeline::CoverPipeline;
use coverfind_core::{AppConfig, CoverRequest, CoverResult};

/// Outcome of one batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    /// One entry per request, same order.
    pub results: Vec<CoverResult>,
    /// Items that ended with a stored file.
    pub stored: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn found(&self) -> usize {
        self.results.iter().filter(|r| r.is_found()).count()
    }
}

#[derive(Clone)]
pub struct BatchProcessor {
    pipeline: Arc<CoverPipeline>,
    delay: Duration,
}

impl BatchProcessor {
    pub fn new(pipeline: Arc<CoverPipeline>, delay: Duration) -> Self {
        Self { pipeline, delay }
    }

    pub fn from_config(pipeline: Arc<CoverPipeline>, config: &AppConfig) -> Self {
        Self::new(pipeline, config.batch_delay())
    }

    /// Resolve and store every request, in order.
    pub async fn process_all(&self, requests: Vec<CoverRequest>) -> BatchReport {
        let started_at = Utc::now();
        let total = requests.len();
        let mut results = Vec::with_capacity(total);

        tracing::info!(total, "batch started");

        for (index, request) in requests.into_iter().enumerate() {
            if index > 0 && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            let pipeline = self.pipeline.clone();
            let task_request = request.clone();
            let handle = tokio::spawn(async move { pipeline.resolve_and_store(&task_request).await });

            let result = match handle.await {
                Ok(result) => result,
                Err(e) => {
                    tracing::warn!(title = %request.title, error = %e, "batch item failed");
                    CoverResult::empty(&request)
                }
            };

            tracing::debug!(index, title = %result.title, found = result.is_found(), stored = result.is_stored(), "batch item done");
            results.push(result);
        }

        let stored = results.iter().filter(|r| r.is_stored()).count();
        let finished_at = Utc::now();

        tracing::info!(total, stored, elapsed_ms = (finished_at - started_at).num_milliseconds(), "batch finished");

        BatchReport { results, stored, started_at, finished_at }
    }
}
