//! MCP (Model Context Protocol) report gateway.
//!
//! Exposes fixed GA4 report queries as MCP tools. Each tool validates its
//! arguments against the metric catalog, makes one GA4 call, and returns
//! the rows as text.
//!
//! # Architecture
//!
//! ```text
//! MCP Client (agent)
//!   ↓ get_7_day_active_users(start_date, end_date, dimensions?, filters?)
//! Ga4McpServer
//!   ↓
//! ReportGateway
//!   ├── select_dimensions (whitelist, order preserved)
//!   ├── build_filter      (exact-match AND tree)
//!   ├── AnalyticsBackend::run_report (one call, no retry)
//!   └── format_report     → one text line per row
//!   ↓
//! CallToolResult (is_error on backend failure)
//! ```

pub mod config;
pub mod gateway;
pub mod params;
pub mod server;
pub mod transport;

pub use config::{DimensionSource, GatewayConfig, GatewayConfigBuilder};
pub use gateway::{ReportGateway, ToolOutput};
pub use params::{DimensionsParams, ReportParams};
pub use server::Ga4McpServer;
pub use transport::{serve_sse, serve_stdio};
