//! cover_search and cover_resolve tool implementations.
//!
//! Both run the source cascade for one book; `cover_resolve` also stores
//! the image locally.

use coverfind_client::CoverPipeline;
use coverfind_core::{CoverRequest, Error};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;

/// Input parameters for cover_search and cover_resolve.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CoverSearchParams {
    /// Book title (required).
    pub title: String,

    /// Authors in credit order. The first is used for author-aware queries.
    #[serde(default)]
    pub authors: Vec<String>,
}

impl CoverSearchParams {
    pub fn into_request(self) -> Result<CoverRequest, Error> {
        if self.title.trim().is_empty() {
            return Err(Error::InvalidInput("title cannot be empty".into()));
        }
        Ok(CoverRequest::new(self.title, self.authors))
    }
}

/// Implementation of the cover_search tool.
pub async fn search_impl(pipeline: &CoverPipeline, params: CoverSearchParams) -> Result<CallToolResult, McpError> {
    let request = params.into_request()?;
    let result = pipeline.search_cover(&request).await;
    json_result(&result)
}

/// Implementation of the cover_resolve tool.
pub async fn resolve_impl(pipeline: &CoverPipeline, params: CoverSearchParams) -> Result<CallToolResult, McpError> {
    let request = params.into_request()?;
    let result = pipeline.resolve_and_store(&request).await;
    json_result(&result)
}
