//! GA4 Data API client (`runReport` and `getMetadata`) over `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::AnalyticsBackend;
use super::auth::{Credentials, TokenProvider};
use crate::core::report::{ReportRequest, ReportResponse};
use crate::error::AnalyticsError;

/// Public GA4 Data API base URL.
pub const DEFAULT_API_BASE: &str = "https://analyticsdata.googleapis.com/v1beta";

/// Error envelope returned by Google APIs.
#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MetadataResponse {
    #[serde(default)]
    dimensions: Vec<DimensionMetadata>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DimensionMetadata {
    api_name: String,
}

/// Normalizes `123` or `properties/123` to `properties/123`.
#[must_use]
pub fn property_resource(property_id: &str) -> String {
    let id = property_id.trim().trim_matches('/');
    if id.starts_with("properties/") {
        id.to_string()
    } else {
        format!("properties/{id}")
    }
}

/// Client for a single GA4 property.
///
/// `reqwest::Client` is internally reference counted and safe to share, so
/// one `Ga4Client` serves every concurrent tool call.
#[derive(Debug)]
pub struct Ga4Client {
    http: reqwest::Client,
    api_base: String,
    property: String,
    tokens: TokenProvider,
}

impl Ga4Client {
    /// Creates a client for `property_id`.
    ///
    /// # Arguments
    ///
    /// * `property_id` - Numeric property id or `properties/<id>`.
    /// * `credentials` - How to obtain bearer tokens.
    /// * `api_base` - API root, normally [`DEFAULT_API_BASE`].
    /// * `timeout` - Per-request timeout applied by the HTTP transport.
    pub fn new(
        property_id: &str,
        credentials: Credentials,
        api_base: &str,
        timeout: Duration,
    ) -> Result<Self, AnalyticsError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("ga4-mcp/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AnalyticsError::Transport {
                url: api_base.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            tokens: TokenProvider::new(credentials, http.clone()),
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            property: property_resource(property_id),
        })
    }

    /// The `properties/<id>` resource this client reports on.
    #[must_use]
    pub fn property(&self) -> &str {
        &self.property
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        url: &str,
    ) -> Result<T, AnalyticsError> {
        let token = self.tokens.access_token().await?;
        let transport = |e: reqwest::Error| AnalyticsError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        };

        let response = request.bearer_auth(token).send().await.map_err(transport)?;
        let status = response.status();
        let body = response.text().await.map_err(transport)?;

        if !status.is_success() {
            return Err(api_error(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|e| AnalyticsError::Decode {
            message: e.to_string(),
        })
    }
}

fn api_error(status: u16, body: &str) -> AnalyticsError {
    let message = match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(ApiErrorBody { error }) => match error.status {
            Some(code) => format!("{code}: {}", error.message),
            None => error.message,
        },
        Err(_) => body.trim().to_string(),
    };
    AnalyticsError::Api { status, message }
}

#[async_trait]
impl AnalyticsBackend for Ga4Client {
    async fn run_report(&self, request: &ReportRequest) -> Result<ReportResponse, AnalyticsError> {
        let url = format!("{}/{}:runReport", self.api_base, self.property);
        debug!(
            metric = request.metric().unwrap_or_default(),
            dimensions = request.dimensions.len(),
            filtered = request.dimension_filter.is_some(),
            "runReport"
        );
        self.send(self.http.post(&url).json(request), &url).await
    }

    async fn dimension_names(&self) -> Result<Vec<String>, AnalyticsError> {
        let url = format!("{}/{}/metadata", self.api_base, self.property);
        let metadata: MetadataResponse = self.send(self.http.get(&url), &url).await?;
        Ok(metadata
            .dimensions
            .into_iter()
            .map(|d| d.api_name)
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::core::filter::{EqualityPredicate, FilterExpression};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> Ga4Client {
        Ga4Client::new(
            "123456",
            Credentials::AccessToken("test-token".into()),
            &server.uri(),
            Duration::from_secs(5),
        )
        .unwrap_or_else(|e| panic!("client: {e}"))
    }

    #[test]
    fn test_property_resource() {
        assert_eq!(property_resource("123"), "properties/123");
        assert_eq!(property_resource("properties/123"), "properties/123");
        assert_eq!(property_resource(" 123/ "), "properties/123");
    }

    #[tokio::test]
    async fn test_run_report_sends_validated_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/properties/123456:runReport"))
            .and(header("authorization", "Bearer test-token"))
            .and(body_partial_json(json!({
                "metrics": [{ "name": "activeUsers" }],
                "dimensions": [{ "name": "country" }],
                "dimensionFilter": {
                    "filter": {
                        "fieldName": "country",
                        "stringFilter": { "matchType": "EXACT", "value": "US" }
                    }
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "dimensionHeaders": [{ "name": "country" }],
                "metricHeaders": [{ "name": "activeUsers", "type": "TYPE_INTEGER" }],
                "rows": [{
                    "dimensionValues": [{ "value": "United States" }],
                    "metricValues": [{ "value": "321" }]
                }],
                "rowCount": 1
            })))
            .expect(1)
            .mount(&server)
            .await;

        let request = ReportRequest::new(
            "activeUsers",
            "2024-01-01",
            "2024-01-31",
            vec!["country".to_string()],
            Some(FilterExpression::Equals(EqualityPredicate::new("country", "US"))),
        );
        let response = client(&server)
            .run_report(&request)
            .await
            .unwrap_or_else(|e| panic!("run_report: {e}"));

        assert_eq!(response.rows.len(), 1);
        assert_eq!(response.rows[0].metric_values[0].value, "321");
    }

    #[tokio::test]
    async fn test_api_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/properties/123456:runReport"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {
                    "code": 400,
                    "message": "Field fooBar is not a valid dimension.",
                    "status": "INVALID_ARGUMENT"
                }
            })))
            .mount(&server)
            .await;

        let request = ReportRequest::new("activeUsers", "today", "today", Vec::new(), None);
        match client(&server).run_report(&request).await {
            Err(AnalyticsError::Api { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(
                    message,
                    "INVALID_ARGUMENT: Field fooBar is not a valid dimension."
                );
            }
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_json_error_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway\n"))
            .mount(&server)
            .await;

        let request = ReportRequest::new("activeUsers", "today", "today", Vec::new(), None);
        let err = client(&server).run_report(&request).await.err();
        assert_eq!(
            err.map(|e| e.to_string()).as_deref(),
            Some("GA4 API error (502): Bad Gateway")
        );
    }

    #[tokio::test]
    async fn test_dimension_names_from_metadata() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/properties/123456/metadata"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "properties/123456/metadata",
                "dimensions": [
                    { "apiName": "date", "uiName": "Date", "category": "Time" },
                    { "apiName": "customEvent:plan", "uiName": "Plan", "customDefinition": true }
                ],
                "metrics": [{ "apiName": "activeUsers" }]
            })))
            .mount(&server)
            .await;

        let names = client(&server)
            .dimension_names()
            .await
            .unwrap_or_else(|e| panic!("metadata: {e}"));
        assert_eq!(names, vec!["date", "customEvent:plan"]);
    }
}
