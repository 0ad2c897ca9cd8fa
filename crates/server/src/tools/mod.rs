//! MCP tool implementations.
//!
//! This module contains all tools exposed by the mcp-covers server.

pub mod cover_batch;
pub mod cover_cleanup;
pub mod cover_materialize;
pub mod cover_search;

pub use cover_batch::{CoverBatchParams, batch_impl};
pub use cover_cleanup::{CoverCleanupParams, cleanup_impl};
pub use cover_materialize::{CoverMaterializeParams, materialize_impl};
pub use cover_search::{CoverSearchParams, resolve_impl, search_impl};

use coverfind_core::Error;
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde::Serialize;

/// Pretty JSON text content, the output shape of every tool.
pub(crate) fn json_result<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output).map_err(|e| Error::Parse(format!("failed to serialize output: {e}")))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[cfg(test)]
pub(crate) fn output_json(result: &CallToolResult) -> serde_json::Value {
    let text = result
        .content
        .first()
        .and_then(|c| c.as_text())
        .map(|t| t.text.clone())
        .unwrap();
    serde_json::from_str(&text).unwrap()
}
