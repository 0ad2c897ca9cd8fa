//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use std::sync::Arc;

use coverfind_client::CoverPipeline;
use coverfind_core::AppConfig;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

use crate::tools::{
    CoverBatchParams, CoverCleanupParams, CoverMaterializeParams, CoverSearchParams, batch_impl, cleanup_impl,
    materialize_impl, resolve_impl, search_impl,
};

/// The main MCP server handler for mcp-covers.
#[derive(Clone)]
pub struct CoverServer {
    pipeline: Arc<CoverPipeline>,
    config: Arc<AppConfig>,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
#[tool_router]
impl CoverServer {
    pub fn new(pipeline: CoverPipeline, config: AppConfig) -> Self {
        Self { pipeline: Arc::new(pipeline), config: Arc::new(config), tool_router: Self::tool_router() }
    }

    /// Find a cover URL for one book without storing anything.
    #[tool(
        description = "Find a cover image URL for a book by title and authors. Tries catalog, metadata API, ISBN and image-search sources in a fixed order. Returns {title, authors, coverUrl?}."
    )]
    async fn cover_search(&self, params: Parameters<CoverSearchParams>) -> Result<CallToolResult, McpError> {
        search_impl(&self.pipeline, params.0).await
    }

    /// Download a known cover URL into the covers directory.
    #[tool(
        description = "Store a known cover URL locally under the book's deterministic file name. Reuses an existing file without downloading. Returns {title, authors, coverUrl, localPath?}."
    )]
    async fn cover_materialize(&self, params: Parameters<CoverMaterializeParams>) -> Result<CallToolResult, McpError> {
        materialize_impl(&self.pipeline, params.0).await
    }

    /// Search then store.
    #[tool(description = "Find a cover for one book and store it locally. Returns {title, authors, coverUrl?, localPath?}.")]
    async fn cover_resolve(&self, params: Parameters<CoverSearchParams>) -> Result<CallToolResult, McpError> {
        resolve_impl(&self.pipeline, params.0).await
    }

    #[tool(
        description = "Find and store covers for many books sequentially, pausing between books. One result per book in input order, plus a summary."
    )]
    async fn cover_batch(&self, params: Parameters<CoverBatchParams>) -> Result<CallToolResult, McpError> {
        batch_impl(self.pipeline.clone(), &self.config, params.0).await
    }

    #[tool(description = "Delete stored cover files whose public path is not in the referenced list. Returns {removed}.")]
    async fn cover_cleanup(&self, params: Parameters<CoverCleanupParams>) -> Result<CallToolResult, McpError> {
        cleanup_impl(&self.pipeline, params.0).await
    }
}

impl ServerHandler for CoverServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "mcp-covers".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tools_registered() {
        let server = CoverServer::new(CoverPipeline::from_config(&AppConfig::default()).unwrap(), AppConfig::default());
        let mut names: Vec<String> = server.tool_router.list_all().into_iter().map(|t| t.name.to_string()).collect();
        names.sort();
        assert_eq!(names, vec!["cover_batch", "cover_cleanup", "cover_materialize", "cover_resolve", "cover_search"]);
    }

    #[test]
    fn test_server_info() {
        let server = CoverServer::new(CoverPipeline::from_config(&AppConfig::default()).unwrap(), AppConfig::default());
        assert_eq!(server.get_info().server_info.name, "mcp-covers");
    }
}
