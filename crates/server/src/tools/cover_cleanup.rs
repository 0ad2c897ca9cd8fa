//! cover_cleanup tool implementation.
//!
//! Deletes stored covers that no book record references any more.

use coverfind_client::CoverPipeline;
use coverfind_core::Error;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::json_result;

/// Parameters for the cover_cleanup tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CoverCleanupParams {
    /// Public paths still in use (e.g. "/covers/dune_by_frank_herbert.jpg").
    #[serde(default)]
    pub referenced: Vec<String>,

    /// Required to run with an empty `referenced` list, which removes every stored cover.
    #[serde(default)]
    pub remove_all: bool,
}

/// Output from the cover_cleanup tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CoverCleanupOutput {
    /// Number of files deleted.
    pub removed: usize,
}

/// Implementation of the cover_cleanup tool.
pub async fn cleanup_impl(pipeline: &CoverPipeline, params: CoverCleanupParams) -> Result<CallToolResult, McpError> {
    if params.referenced.is_empty() && !params.remove_all {
        return Err(Error::InvalidInput("referenced is empty; set remove_all to delete every stored cover".into()).into());
    }

    let referenced: HashSet<String> = params.referenced.into_iter().collect();
    let removed = pipeline.cleanup_orphans(&referenced).await?;

    json_result(&CoverCleanupOutput { removed })
}
