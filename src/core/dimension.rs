//! Dimension whitelist validation.

use super::catalog::MetricDescriptor;

/// Outcome of validating requested dimensions against a metric.
///
/// `accepted` is what goes into the report request. `rejected` is a
/// diagnostic only: unsupported names are dropped, never reported as errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DimensionSelection {
    /// Supported names, in request order.
    pub accepted: Vec<String>,
    /// Unsupported names, in request order.
    pub rejected: Vec<String>,
}

impl DimensionSelection {
    /// Returns `true` if any requested name was dropped.
    #[must_use]
    pub fn has_rejections(&self) -> bool {
        !self.rejected.is_empty()
    }
}

/// Splits `requested` into the names `metric` supports and the ones it does not.
///
/// Order is preserved on both sides. An empty `accepted` list means the
/// report is not grouped by any dimension.
pub fn select_dimensions<S: AsRef<str>>(
    requested: &[S],
    metric: &MetricDescriptor,
) -> DimensionSelection {
    let (accepted, rejected): (Vec<String>, Vec<String>) = requested
        .iter()
        .map(|name| name.as_ref().to_string())
        .partition(|name| metric.supports(name));

    DimensionSelection { accepted, rejected }
}
