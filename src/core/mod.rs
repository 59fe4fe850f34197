//! Core report logic: metric whitelists, dimension and filter validation,
//! report request/response types, and response formatting.
//!
//! Nothing in here performs I/O. The gateway composes these pieces around a
//! single backend call per tool invocation.

pub mod catalog;
pub mod dimension;
pub mod filter;
pub mod format;
pub mod report;

pub use catalog::{MetricCatalog, MetricDescriptor, SUPPORTED_METRICS};
pub use dimension::{DimensionSelection, select_dimensions};
pub use filter::{EqualityPredicate, FilterBuild, FilterExpression, build_filter};
pub use format::{NO_DATA, format_report};
pub use report::{ReportRequest, ReportResponse, Row};
