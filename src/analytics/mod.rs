//! Analytics backend: the GA4 Data API and the seam the gateway calls it through.

pub mod auth;
pub mod client;

use async_trait::async_trait;

use crate::core::report::{ReportRequest, ReportResponse};
use crate::error::AnalyticsError;

pub use auth::{Credentials, ServiceAccountKey, TokenProvider};
pub use client::{DEFAULT_API_BASE, Ga4Client};

/// Operations the report gateway needs from an analytics backend.
///
/// Implementations must be safe to call concurrently from independent tool
/// invocations; none of them retry.
#[async_trait]
pub trait AnalyticsBackend: Send + Sync {
    /// Runs one report and returns the raw tabular response.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError`] on auth, transport, API or decode failures.
    async fn run_report(&self, request: &ReportRequest) -> Result<ReportResponse, AnalyticsError>;

    /// Lists every dimension API name the property supports.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError`] on auth, transport, API or decode failures.
    async fn dimension_names(&self) -> Result<Vec<String>, AnalyticsError>;
}
