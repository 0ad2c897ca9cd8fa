//! cover_batch tool implementation.
//!
//! Resolves and stores covers for many books, one at a time, with a pause
//! between items to stay under third-party rate limits.

use chrono::{DateTime, Utc};
use coverfind_client::{BatchProcessor, CoverPipeline};
use coverfind_core::{AppConfig, CoverRequest, CoverResult, Error};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use super::json_result;

/// Upper bound on books per call.
pub const MAX_BATCH_SIZE: usize = 500;

/// Upper bound on the per-call delay override.
const MAX_DELAY_MS: u64 = 60_000;

/// Input parameters for cover_batch tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CoverBatchParams {
    /// Books to process, in order.
    pub books: Vec<CoverRequest>,

    /// Pause between books in milliseconds (default: configured batch delay).
    #[serde(default)]
    pub delay_ms: Option<u64>,
}

/// Batch summary statistics.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BatchSummary {
    /// Number of books processed.
    pub total: usize,
    /// Books for which a source returned a cover URL.
    pub found: usize,
    /// Books that ended with a stored file.
    pub stored: usize,
}

/// Output structure for cover_batch tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverBatchOutput {
    /// One result per book, in input order.
    pub results: Vec<CoverResult>,
    pub summary: BatchSummary,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Implementation of the cover_batch tool.
pub async fn batch_impl(
    pipeline: Arc<CoverPipeline>, config: &AppConfig, params: CoverBatchParams,
) -> Result<CallToolResult, McpError> {
    if params.books.is_empty() {
        return Err(Error::InvalidInput("books cannot be empty".into()).into());
    }

    if params.books.len() > MAX_BATCH_SIZE {
        return Err(Error::InvalidInput(format!("at most {MAX_BATCH_SIZE} books per batch")).into());
    }

    if let Some(index) = params.books.iter().position(|b| b.title.trim().is_empty()) {
        return Err(Error::InvalidInput(format!("books[{index}].title cannot be empty")).into());
    }

    let delay = params
        .delay_ms
        .map(|ms| Duration::from_millis(ms.min(MAX_DELAY_MS)))
        .unwrap_or_else(|| config.batch_delay());

    let report = BatchProcessor::new(pipeline, delay).process_all(params.books).await;

    let summary = BatchSummary { total: report.total(), found: report.found(), stored: report.stored };
    let output = CoverBatchOutput {
        results: report.results,
        summary,
        started_at: report.started_at,
        finished_at: report.finished_at,
    };

    json_result(&output)
}
