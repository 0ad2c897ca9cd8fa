//! cover_materialize tool implementation.
//!
//! Stores an already known cover URL under the book's deterministic file name.

use coverfind_client::CoverPipeline;
use coverfind_client::http::parse_http_url;
use coverfind_core::{CoverRequest, CoverResult, Error};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;

/// Parameters for the cover_materialize tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CoverMaterializeParams {
    /// Book title; determines the stored file name.
    pub title: String,

    /// Authors in credit order; the first one is part of the file name.
    #[serde(default)]
    pub authors: Vec<String>,

    /// Image URL to download (http or https).
    pub cover_url: String,
}

/// Implementation of the cover_materialize tool.
///
/// A failed download is not an error: the result simply has no `localPath`.
pub async fn materialize_impl(pipeline: &CoverPipeline, params: CoverMaterializeParams) -> Result<CallToolResult, McpError> {
    if params.title.trim().is_empty() {
        return Err(Error::InvalidInput("title cannot be empty".into()).into());
    }
    let cover_url = parse_http_url(&params.cover_url).map_err(Error::from)?;

    let request = CoverRequest::new(params.title, params.authors);
    let result = pipeline.materialize(CoverResult::empty(&request).with_cover_url(cover_url)).await;

    json_result(&result)
}
