//! # ga4-mcp
//!
//! Google Analytics 4 report tools over the Model Context Protocol, plus a
//! conversational agent that drives them.
//!
//! ## Overview
//!
//! The report gateway publishes a fixed set of GA4 Data API queries as MCP
//! tools: active users over 1, 7 and 28 day windows, ad-unit exposure, and a
//! dimension listing. Callers choose a date range, optional breakdown
//! dimensions and optional equality filters. Names a metric does not support
//! are dropped before the query is sent, and results come back as one text
//! entry per row.
//!
//! The agent side connects to a running gateway, discovers its tools once,
//! and hands them to a single assistant backed by an OpenAI-compatible chat
//! model (Gemini by default).
//!
//! ## Modules
//!
//! - [`core`]: metric catalog, dimension selection, filter building, row formatting
//! - [`analytics`]: GA4 Data API client and service-account auth
//! - [`mcp`]: the report gateway and its MCP server
//! - [`agent`]: tool discovery and the `analytics_assistant` agent
//! - [`cli`]: command-line interface
//! - [`error`]: error types

pub mod agent;
pub mod analytics;
pub mod cli;
pub mod core;
pub mod error;
pub mod mcp;

// Re-export commonly used types
pub use analytics::{AnalyticsBackend, Credentials, Ga4Client};
pub use core::{MetricCatalog, ReportRequest, ReportResponse};
pub use error::{Error, Result};
pub use mcp::{Ga4McpServer, GatewayConfig, ReportGateway, ReportParams};
