//! Report response → display text.

use tracing::warn;

use super::report::ReportResponse;

/// Entry returned when a report has no rows.
pub const NO_DATA: &str = "No data found for the given parameters.";

/// Renders each row as `"header: value, header: value, ..."`.
///
/// Headers (dimensions, then metrics) are paired positionally with row
/// values (dimension values, then metric values). A row whose width differs
/// from the header count is still rendered, zipped to the shorter side.
/// An empty report yields a single [`NO_DATA`] entry.
pub fn format_report(response: &ReportResponse) -> Vec<String> {
    if response.rows.is_empty() {
        return vec![NO_DATA.to_string()];
    }

    if !response.is_well_formed() {
        warn!(
            headers = response.dimension_headers.len() + response.metric_headers.len(),
            "report rows do not match header count; columns may be mispaired"
        );
    }

    let headers: Vec<&str> = response.headers().collect();

    response
        .rows
        .iter()
        .map(|row| {
            headers
                .iter()
                .zip(row.values())
                .map(|(header, value)| format!("{header}: {value}"))
                .collect::<Vec<_>>()
                .join(", ")
        })
        .collect()
}
