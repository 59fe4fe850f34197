//! MCP server implementation for ga4-mcp.
//!
//! One tool per supported GA4 metric, plus `list_supported_dimensions`.
//! Every tool delegates to the shared [`ReportGateway`].

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};

use super::gateway::{ReportGateway, ToolOutput};
use super::params::{DimensionsParams, ReportParams};
use crate::core::catalog::{
    ACTIVE_1_DAY_USERS, ACTIVE_7_DAY_USERS, ACTIVE_28_DAY_USERS, ACTIVE_USERS, AD_UNIT_EXPOSURE,
};

/// Converts gateway output into an MCP result, one text entry per line.
fn into_result(output: ToolOutput) -> CallToolResult {
    let content = output.lines.into_iter().map(Content::text).collect();
    if output.is_error {
        CallToolResult::error(content)
    } else {
        CallToolResult::success(content)
    }
}

/// GA4 report MCP server.
#[derive(Clone)]
pub struct Ga4McpServer {
    tool_router: ToolRouter<Self>,
    gateway: ReportGateway,
}

#[tool_router]
impl Ga4McpServer {
    #[tool(
        name = "get_active_users",
        description = "Get the active users metric (activeUsers) for a date range, optionally grouped by supported dimensions and filtered by exact dimension values. Dates are YYYY-MM-DD or relative (today, yesterday, NdaysAgo)."
    )]
    async fn get_active_users(
        &self,
        Parameters(params): Parameters<ReportParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(into_result(self.gateway.run_report(ACTIVE_USERS, &params).await))
    }

    #[tool(
        name = "get_1_day_active_users",
        description = "Get the 1-day active users metric (active1DayUsers) for a date range, optionally grouped by supported dimensions and filtered by exact dimension values."
    )]
    async fn get_1_day_active_users(
        &self,
        Parameters(params): Parameters<ReportParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(into_result(
            self.gateway.run_report(ACTIVE_1_DAY_USERS, &params).await,
        ))
    }

    #[tool(
        name = "get_7_day_active_users",
        description = "Get the 7-day active users metric (active7DayUsers) for a date range, optionally grouped by supported dimensions and filtered by exact dimension values."
    )]
    async fn get_7_day_active_users(
        &self,
        Parameters(params): Parameters<ReportParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(into_result(
            self.gateway.run_report(ACTIVE_7_DAY_USERS, &params).await,
        ))
    }

    #[tool(
        name = "get_28_day_active_users",
        description = "Get the 28-day active users metric (active28DayUsers) for a date range, optionally grouped by supported dimensions and filtered by exact dimension values."
    )]
    async fn get_28_day_active_users(
        &self,
        Parameters(params): Parameters<ReportParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(into_result(
            self.gateway.run_report(ACTIVE_28_DAY_USERS, &params).await,
        ))
    }

    #[tool(
        name = "get_ad_unit_exposure",
        description = "Get the ad unit exposure metric (adUnitExposure) for a date range, optionally grouped by supported ad, page and platform dimensions."
    )]
    async fn get_ad_unit_exposure(
        &self,
        Parameters(params): Parameters<ReportParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(into_result(
            self.gateway.run_report(AD_UNIT_EXPOSURE, &params).await,
        ))
    }

    #[tool(
        name = "list_supported_dimensions",
        description = "List the dimension names a GA4 metric can be grouped or filtered by. Use before a report call when unsure which dimensions are valid."
    )]
    async fn list_supported_dimensions(
        &self,
        Parameters(params): Parameters<DimensionsParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(into_result(self.gateway.supported_dimensions(&params.metric)))
    }
}

#[tool_handler]
impl ServerHandler for Ga4McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "ga4-mcp".to_string(),
                title: Some("GA4 Report MCP Server".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                website_url: Some("https://github.com/zircote/ga4-mcp".to_string()),
            },
            instructions: Some(
                "Google Analytics 4 reports for a single property. Each get_* tool reports one \
                 metric over a date range; pass `dimensions` to group rows and `filters` for \
                 exact-match conditions. Unsupported names are ignored; call \
                 `list_supported_dimensions` to see what a metric accepts."
                    .to_string(),
            ),
        }
    }
}

impl Ga4McpServer {
    /// Creates a new MCP server over `gateway`.
    #[must_use]
    pub fn new(gateway: ReportGateway) -> Self {
        Self {
            tool_router: Self::tool_router(),
            gateway,
        }
    }
}
