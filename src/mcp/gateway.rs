//! Report gateway: validation around one backend call per tool invocation.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use super::config::{DimensionSource, GatewayConfig};
use super::params::ReportParams;
use crate::analytics::{AnalyticsBackend, Ga4Client};
use crate::core::{MetricCatalog, ReportRequest, build_filter, format_report, select_dimensions};
use crate::error::Result;

/// Text lines produced by a tool, plus what validation dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// One entry per report row, or a single message entry.
    pub lines: Vec<String>,
    /// `true` when `lines` holds a single `Error: ...` entry.
    pub is_error: bool,
    /// Requested dimensions the metric does not support.
    pub rejected_dimensions: Vec<String>,
    /// Filter keys the metric does not support.
    pub rejected_filters: Vec<String>,
}

impl ToolOutput {
    fn error(message: impl std::fmt::Display) -> Self {
        Self {
            lines: vec![format!("Error: {message}")],
            is_error: true,
            ..Self::default()
        }
    }
}

/// Shared state behind every report tool.
///
/// Cloning is cheap: both fields are reference counted and read-only.
#[derive(Clone)]
pub struct ReportGateway {
    catalog: Arc<MetricCatalog>,
    backend: Arc<dyn AnalyticsBackend>,
}

impl ReportGateway {
    /// Creates a gateway over an existing catalog and backend.
    pub fn new(catalog: MetricCatalog, backend: Arc<dyn AnalyticsBackend>) -> Self {
        Self {
            catalog: Arc::new(catalog),
            backend,
        }
    }

    /// Builds the GA4 client and metric catalog described by `config`.
    ///
    /// With [`DimensionSource::Metadata`] this performs one metadata call;
    /// its failure is returned rather than falling back to the built-in lists.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the metadata
    /// fetch fails.
    pub async fn connect(config: &GatewayConfig) -> Result<Self> {
        let client = Ga4Client::new(
            &config.property_id,
            config.credentials.clone(),
            &config.api_base,
            config.timeout,
        )?;
        let property = client.property().to_string();
        let backend: Arc<dyn AnalyticsBackend> = Arc::new(client);

        let catalog = match config.dimension_source {
            DimensionSource::Builtin => MetricCatalog::builtin(),
            DimensionSource::Metadata => {
                let names = backend.dimension_names().await?;
                info!(dimensions = names.len(), "loaded dimension metadata");
                MetricCatalog::uniform(names)
            }
        };

        info!(
            %property,
            source = %config.dimension_source,
            metrics = catalog.len(),
            "report gateway ready"
        );
        Ok(Self::new(catalog, backend))
    }

    /// Runs one report for `metric`.
    ///
    /// Unsupported dimensions and filter keys are dropped before the request
    /// is built. Backend failures come back as a single error-tagged entry.
    pub async fn run_report(&self, metric: &str, params: &ReportParams) -> ToolOutput {
        let Some(descriptor) = self.catalog.get(metric) else {
            return ToolOutput::error(format!("unsupported metric '{metric}'"));
        };

        let selection = select_dimensions(params.dimensions.as_deref().unwrap_or_default(), descriptor);
        let empty = IndexMap::new();
        let filter = build_filter(params.filters.as_ref().unwrap_or(&empty), descriptor);

        if selection.has_rejections() || !filter.rejected.is_empty() {
            debug!(
                metric,
                rejected_dimensions = ?selection.rejected,
                rejected_filters = ?filter.rejected,
                "dropped unsupported names"
            );
        }

        let request = ReportRequest::new(
            metric,
            params.start_date.as_str(),
            params.end_date.as_str(),
            selection.accepted,
            filter.expression,
        );

        let mut output = match self.backend.run_report(&request).await {
            Ok(response) => ToolOutput {
                lines: format_report(&response),
                ..ToolOutput::default()
            },
            Err(e) => {
                warn!(metric, error = %e, "report failed");
                ToolOutput::error(e)
            }
        };
        output.rejected_dimensions = selection.rejected;
        output.rejected_filters = filter.rejected;
        output
    }

    /// Lists the dimensions `metric` accepts, sorted.
    pub fn supported_dimensions(&self, metric: &str) -> ToolOutput {
        self.catalog.get(metric).map_or_else(
            || {
                let known: Vec<&str> = self.catalog.iter().map(|d| d.name()).collect();
                ToolOutput::error(format!(
                    "unsupported metric '{metric}' (expected one of: {})",
                    known.join(", ")
                ))
            },
            |descriptor| ToolOutput {
                lines: descriptor.dimensions().map(str::to_string).collect(),
                ..ToolOutput::default()
            },
        )
    }
}

impl std::fmt::Debug for ReportGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportGateway")
            .field("metrics", &self.catalog.len())
            .finish_non_exhaustive()
    }
}
