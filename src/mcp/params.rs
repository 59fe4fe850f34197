//! MCP tool parameter types.
//!
//! Defines the input schemas for MCP tools using `schemars` for automatic
//! JSON Schema generation required by the MCP protocol.

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Parameters shared by every report tool.
///
/// Dates are passed through to GA4 untouched, so relative forms such as
/// `today`, `yesterday` or `7daysAgo` work alongside `YYYY-MM-DD`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReportParams {
    /// Start date in `YYYY-MM-DD` format (or a GA4 relative date).
    pub start_date: String,

    /// End date in `YYYY-MM-DD` format (or a GA4 relative date).
    pub end_date: String,

    /// Dimensions to group by, e.g. `["date", "country"]`. Names the metric
    /// does not support are ignored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Vec<String>>,

    /// Exact-match filters, e.g. `{"country": "France"}`. Several keys are
    /// combined with AND. Keys the metric does not support are ignored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<IndexMap<String, Value>>,
}

/// Parameters for the `list_supported_dimensions` tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DimensionsParams {
    /// GA4 metric API name, e.g. `active7DayUsers`.
    pub metric: String,
}
