//! Report request and response types.
//!
//! These mirror the GA4 Data API v1beta `runReport` JSON body and response,
//! so they serialize straight onto the wire.

use serde::{Deserialize, Serialize};

use super::filter::FilterExpression;

/// Inclusive calendar date range. Dates are passed through unparsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    /// Start date, e.g. `2024-01-01`, `7daysAgo`, `yesterday`.
    pub start_date: String,
    /// End date, e.g. `2024-01-31`, `today`.
    pub end_date: String,
}

/// A named dimension or metric reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// API name.
    pub name: String,
}

impl Field {
    fn named(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Body of a `runReport` call: one date range, one metric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    /// Date ranges (always exactly one).
    pub date_ranges: Vec<DateRange>,
    /// Grouping dimensions, already validated.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dimensions: Vec<Field>,
    /// Metrics (always exactly one).
    pub metrics: Vec<Field>,
    /// Optional equality filter over dimensions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimension_filter: Option<FilterExpression>,
}

impl ReportRequest {
    /// Builds a single-metric, single-range request.
    ///
    /// `dimensions` must already be validated against the metric's whitelist.
    pub fn new(
        metric: &str,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
        dimensions: Vec<String>,
        dimension_filter: Option<FilterExpression>,
    ) -> Self {
        Self {
            date_ranges: vec![DateRange {
                start_date: start_date.into(),
                end_date: end_date.into(),
            }],
            dimensions: dimensions.into_iter().map(Field::named).collect(),
            metrics: vec![Field::named(metric)],
            dimension_filter,
        }
    }

    /// The metric this request reports on.
    #[must_use]
    pub fn metric(&self) -> Option<&str> {
        self.metrics.first().map(|m| m.name.as_str())
    }

    /// Dimension names in request order.
    pub fn dimension_names(&self) -> impl Iterator<Item = &str> {
        self.dimensions.iter().map(|d| d.name.as_str())
    }
}

/// Header of a response column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Column name.
    pub name: String,
}

/// A single cell value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Cell value as returned by the API (always a string).
    #[serde(default)]
    pub value: String,
}

/// One response row; values are parallel to the response headers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    /// Dimension values, parallel to `dimension_headers`.
    #[serde(default)]
    pub dimension_values: Vec<Cell>,
    /// Metric values, parallel to `metric_headers`.
    #[serde(default)]
    pub metric_values: Vec<Cell>,
}

impl Row {
    /// Convenience constructor, mostly for tests and fixtures.
    pub fn new<D, M>(dimension_values: D, metric_values: M) -> Self
    where
        D: IntoIterator,
        D::Item: Into<String>,
        M: IntoIterator,
        M::Item: Into<String>,
    {
        Self {
            dimension_values: dimension_values
                .into_iter()
                .map(|v| Cell { value: v.into() })
                .collect(),
            metric_values: metric_values
                .into_iter()
                .map(|v| Cell { value: v.into() })
                .collect(),
        }
    }

    /// Dimension values followed by metric values.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.dimension_values
            .iter()
            .chain(&self.metric_values)
            .map(|c| c.value.as_str())
    }

    fn width(&self) -> usize {
        self.dimension_values.len() + self.metric_values.len()
    }
}

/// `runReport` response. The API omits `rows` when nothing matched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    /// Dimension column headers.
    #[serde(default)]
    pub dimension_headers: Vec<Header>,
    /// Metric column headers.
    #[serde(default)]
    pub metric_headers: Vec<Header>,
    /// Result rows.
    #[serde(default)]
    pub rows: Vec<Row>,
    /// Total rows matching the query, regardless of the row limit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_count: Option<u64>,
}

impl ReportResponse {
    /// Dimension headers followed by metric headers.
    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.dimension_headers
            .iter()
            .chain(&self.metric_headers)
            .map(|h| h.name.as_str())
    }

    /// Returns `true` if every row has exactly one value per header.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        let width = self.dimension_headers.len() + self.metric_headers.len();
        self.rows.iter().all(|r| r.width() == width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::EqualityPredicate;
    use serde_json::json;

    #[test]
    fn test_request_wire_shape() {
        let request = ReportRequest::new(
            "activeUsers",
            "2024-01-01",
            "2024-01-31",
            vec!["country".to_string()],
            Some(FilterExpression::Equals(EqualityPredicate::new("country", "US"))),
        );
        let wire = serde_json::to_value(&request).unwrap_or_default();
        assert_eq!(
            wire["dateRanges"],
            json!([{ "startDate": "2024-01-01", "endDate": "2024-01-31" }])
        );
        assert_eq!(wire["metrics"], json!([{ "name": "activeUsers" }]));
        assert_eq!(wire["dimensions"], json!([{ "name": "country" }]));
        assert_eq!(wire["dimensionFilter"]["filter"]["fieldName"], "country");
    }

    #[test]
    fn test_request_omits_empty_parts() {
        let request = ReportRequest::new("adUnitExposure", "7daysAgo", "today", Vec::new(), None);
        let wire = serde_json::to_value(&request).unwrap_or_default();
        assert!(wire.get("dimensions").is_none());
        assert!(wire.get("dimensionFilter").is_none());
        assert_eq!(request.metric(), Some("adUnitExposure"));
    }

    #[test]
    fn test_response_without_rows() {
        let body = json!({
            "dimensionHeaders": [{ "name": "date" }],
            "metricHeaders": [{ "name": "activeUsers", "type": "TYPE_INTEGER" }],
            "metadata": { "currencyCode": "USD" },
            "kind": "analyticsData#runReport"
        });
        let response: ReportResponse = serde_json::from_value(body).unwrap_or_default();
        assert!(response.rows.is_empty());
        assert_eq!(response.headers().collect::<Vec<_>>(), vec!["date", "activeUsers"]);
    }

    #[test]
    fn test_response_rows_decode() {
        let body = json!({
            "dimensionHeaders": [{ "name": "country" }],
            "metricHeaders": [{ "name": "activeUsers" }],
            "rows": [
                { "dimensionValues": [{ "value": "France" }], "metricValues": [{ "value": "12" }] }
            ],
            "rowCount": 1
        });
        let response: ReportResponse = serde_json::from_value(body).unwrap_or_default();
        assert_eq!(response.rows.len(), 1);
        assert_eq!(response.row_count, Some(1));
        assert_eq!(response.rows[0].values().collect::<Vec<_>>(), vec!["France", "12"]);
        assert!(response.is_well_formed());
    }

    #[test]
    fn test_malformed_row_detected() {
        let response = ReportResponse {
            dimension_headers: vec![Header { name: "date".into() }],
            metric_headers: vec![Header { name: "activeUsers".into() }],
            rows: vec![Row::new(["2024-01-01", "extra"], ["42"])],
            row_count: None,
        };
        assert!(!response.is_well_formed());
    }
}
