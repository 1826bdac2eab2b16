//! MCP server implementation for folio.
//!
//! Exposes portfolio search as MCP tools for AI editors. The index is built
//! once at startup and shared by every tool call.

use std::borrow::Cow;
use std::sync::Arc;

use rmcp::{
    ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolResult, Content, ErrorCode, ErrorData as McpError, ServerCapabilities, ServerInfo,
    },
    schemars, tool, tool_handler, tool_router,
    transport::stdio,
};
use serde::Deserialize;

use crate::commands;
use crate::search::{AdvancedFilters, SearchOptions, SearchService, TypeFilter};

/// Parameters for `search_portfolio` tool.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchParams {
    #[schemars(description = "The search query")]
    pub query: String,
    #[schemars(description = "Maximum number of results (default: 10)")]
    pub limit: Option<usize>,
    #[serde(rename = "type")]
    #[schemars(description = "Record type: project, skill, certification, experience or all")]
    pub kind: Option<String>,
    #[schemars(description = "Minimum relevance score between 0 and 1 (default: 0.1)")]
    pub min_score: Option<f64>,
}

/// Parameters for `advanced_search` tool.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AdvancedParams {
    #[schemars(description = "The search query")]
    pub query: String,
    #[schemars(description = "Keep only results in this category")]
    pub category: Option<String>,
    #[serde(rename = "type")]
    #[schemars(description = "Keep only results of this record type")]
    pub kind: Option<String>,
    #[schemars(description = "Keep only results mentioning this technology")]
    pub technology: Option<String>,
    #[schemars(description = "Maximum number of results (default: 10)")]
    pub limit: Option<usize>,
}

/// MCP server exposing folio tools.
#[derive(Clone)]
pub struct FolioServer {
    service: Arc<SearchService>,
    defaults: SearchOptions,
    tool_router: ToolRouter<Self>,
}

fn internal_error(context: &str, e: &anyhow::Error) -> McpError {
    McpError {
        code: ErrorCode::INTERNAL_ERROR,
        message: Cow::from(format!("{context}: {e}")),
        data: None,
    }
}

#[tool_router]
impl FolioServer {
    #[must_use]
    pub fn new(service: SearchService, defaults: SearchOptions) -> Self {
        Self {
            service: Arc::new(service),
            defaults,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "Search portfolio projects, skills, certifications and experience")]
    async fn search_portfolio(
        &self,
        Parameters(params): Parameters<SearchParams>,
    ) -> Result<CallToolResult, McpError> {
        let options = SearchOptions {
            kind: params
                .kind
                .as_deref()
                .map_or(self.defaults.kind, TypeFilter::parse),
            limit: params.limit.unwrap_or(self.defaults.limit),
            min_score: params.min_score.unwrap_or(self.defaults.min_score),
            ..self.defaults
        };

        match commands::search(&self.service, &params.query, &options) {
            Ok(set) => Ok(CallToolResult::success(vec![Content::text(
                commands::format_results(&set),
            )])),
            Err(e) => Err(internal_error("Search failed", &e)),
        }
    }

    #[tool(description = "Search the portfolio, then filter by category, type or technology")]
    async fn advanced_search(
        &self,
        Parameters(params): Parameters<AdvancedParams>,
    ) -> Result<CallToolResult, McpError> {
        let filters = AdvancedFilters {
            category: params.category,
            kind: params.kind,
            technology: params.technology,
            limit: params.limit,
        };

        match commands::advanced(&self.service, &params.query, &filters) {
            Ok(set) => Ok(CallToolResult::success(vec![Content::text(
                commands::format_advanced(&set),
            )])),
            Err(e) => Err(internal_error("Advanced search failed", &e)),
        }
    }

    #[tool(description = "Count indexed portfolio records by type")]
    async fn search_stats(&self) -> Result<CallToolResult, McpError> {
        let output = commands::format_stats(&self.service.stats());
        Ok(CallToolResult::success(vec![Content::text(output)]))
    }

    #[tool(description = "List curated popular portfolio searches")]
    async fn popular_searches(&self) -> Result<CallToolResult, McpError> {
        Ok(CallToolResult::success(vec![Content::text(
            commands::format_popular(),
        )]))
    }
}

#[tool_handler]
impl ServerHandler for FolioServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "folio searches a professional portfolio. \
                Use search_portfolio for ranked matches, advanced_search to filter by \
                category, type or technology, search_stats for index sizes and \
                popular_searches for suggested queries."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

/// Start the MCP server with stdio transport.
///
/// # Errors
///
/// Returns an error if the server fails to start or encounters a fatal error.
pub async fn serve(service: SearchService, defaults: SearchOptions) -> anyhow::Result<()> {
    let server = FolioServer::new(service, defaults);
    let running = server.serve(stdio()).await?;
    running.waiting().await?;
    Ok(())
}
