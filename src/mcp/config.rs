//! Gateway configuration with builder pattern and environment variable support.
//!
//! Configuration is resolved in order: explicit values → environment variables → defaults.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::analytics::auth::{Credentials, ServiceAccountKey};
use crate::analytics::client::DEFAULT_API_BASE;
use crate::error::ConfigError;

/// Default HTTP timeout for GA4 API calls.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Where each metric's supported-dimension whitelist comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DimensionSource {
    /// Compiled-in per-metric whitelists.
    #[default]
    Builtin,
    /// One metadata fetch at startup; every metric accepts every dimension
    /// the property reports.
    Metadata,
}

impl DimensionSource {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Builtin => "builtin",
            Self::Metadata => "metadata",
        }
    }
}

impl FromStr for DimensionSource {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "builtin" | "static" => Ok(Self::Builtin),
            "metadata" | "dynamic" => Ok(Self::Metadata),
            other => Err(ConfigError::DimensionSource {
                name: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for DimensionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for the report gateway.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// GA4 property id (`123` or `properties/123`).
    pub property_id: String,
    /// Credentials used to obtain bearer tokens.
    pub credentials: Credentials,
    /// GA4 Data API root.
    pub api_base: String,
    /// Source of the dimension whitelists.
    pub dimension_source: DimensionSource,
    /// HTTP request timeout.
    pub timeout: Duration,
}

impl GatewayConfig {
    /// Creates a new builder for `GatewayConfig`.
    #[must_use]
    pub fn builder() -> GatewayConfigBuilder {
        GatewayConfigBuilder::default()
    }

    /// Creates configuration from environment variables with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the property id or credentials are missing
    /// or the credentials file cannot be read.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::builder().from_env().build()
    }
}

/// Builder for [`GatewayConfig`].
#[derive(Debug, Clone, Default)]
pub struct GatewayConfigBuilder {
    property_id: Option<String>,
    credentials: Option<Credentials>,
    credentials_file: Option<PathBuf>,
    client_email: Option<String>,
    private_key: Option<String>,
    token_uri: Option<String>,
    access_token: Option<String>,
    api_base: Option<String>,
    dimension_source: Option<String>,
    timeout: Option<Duration>,
}

impl GatewayConfigBuilder {
    /// Populates unset fields from environment variables.
    #[must_use]
    pub fn from_env(mut self) -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        if self.property_id.is_none() {
            self.property_id = var("GA4_PROPERTY_ID");
        }
        if self.credentials_file.is_none() {
            self.credentials_file = var("GA4_CREDENTIALS_FILE")
                .or_else(|| var("GOOGLE_APPLICATION_CREDENTIALS"))
                .map(PathBuf::from);
        }
        if self.client_email.is_none() {
            self.client_email = var("GA4_CLIENT_EMAIL");
        }
        if self.private_key.is_none() {
            self.private_key = var("GA4_PRIVATE_KEY");
        }
        if self.token_uri.is_none() {
            self.token_uri = var("GA4_TOKEN_URI");
        }
        if self.access_token.is_none() {
            self.access_token = var("GA4_ACCESS_TOKEN");
        }
        if self.api_base.is_none() {
            self.api_base = var("GA4_API_BASE");
        }
        if self.dimension_source.is_none() {
            self.dimension_source = var("GA4_DIMENSION_SOURCE");
        }
        if self.timeout.is_none() {
            self.timeout = var("GA4_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs);
        }
        self
    }

    /// Sets the GA4 property id.
    #[must_use]
    pub fn property_id(mut self, id: impl Into<String>) -> Self {
        self.property_id = Some(id.into());
        self
    }

    /// Sets credentials directly, bypassing every other credential source.
    #[must_use]
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Sets the path of a service-account JSON key file.
    #[must_use]
    pub fn credentials_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials_file = Some(path.into());
        self
    }

    /// Sets inline service-account key parts.
    #[must_use]
    pub fn service_account(
        mut self,
        client_email: impl Into<String>,
        private_key: impl Into<String>,
    ) -> Self {
        self.client_email = Some(client_email.into());
        self.private_key = Some(private_key.into());
        self
    }

    /// Sets a pre-minted bearer token.
    #[must_use]
    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Sets the API base URL.
    #[must_use]
    pub fn api_base(mut self, url: impl Into<String>) -> Self {
        self.api_base = Some(url.into());
        self
    }

    /// Sets the dimension source by name (`builtin` or `metadata`).
    #[must_use]
    pub fn dimension_source(mut self, source: impl Into<String>) -> Self {
        self.dimension_source = Some(source.into());
        self
    }

    /// Sets the HTTP request timeout.
    #[must_use]
    pub const fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Resolves credentials: explicit → key file → inline key → bearer token.
    fn resolve_credentials(&mut self) -> Result<Credentials, ConfigError> {
        if let Some(credentials) = self.credentials.take() {
            return Ok(credentials);
        }
        if let Some(path) = &self.credentials_file {
            return ServiceAccountKey::from_file(path).map(Credentials::ServiceAccount);
        }
        if let (Some(email), Some(key)) = (self.client_email.take(), self.private_key.take()) {
            // Keys pasted into env files usually carry literal "\n" sequences.
            let pem = key.replace("\\n", "\n");
            return Ok(Credentials::ServiceAccount(ServiceAccountKey::new(
                email,
                pem,
                self.token_uri.take(),
            )));
        }
        if let Some(token) = self.access_token.take() {
            return Ok(Credentials::AccessToken(token));
        }
        Err(ConfigError::CredentialsMissing)
    }

    /// Builds the [`GatewayConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if no property id or credentials were set, the
    /// key file is unreadable, or the dimension source name is unknown.
    pub fn build(mut self) -> Result<GatewayConfig, ConfigError> {
        let property_id = self
            .property_id
            .take()
            .filter(|id| !id.trim().is_empty())
            .ok_or(ConfigError::PropertyIdMissing)?;
        let credentials = self.resolve_credentials()?;
        let dimension_source = self
            .dimension_source
            .as_deref()
            .map(str::parse)
            .transpose()?
            .unwrap_or_default();

        Ok(GatewayConfig {
            property_id,
            credentials,
            api_base: self
                .api_base
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            dimension_source,
            timeout: self
                .timeout
                .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builder_defaults() {
        let config = GatewayConfig::builder()
            .property_id("123")
            .access_token("tok")
            .build()
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(config.property_id, "123");
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.dimension_source, DimensionSource::Builtin);
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert!(matches!(config.credentials, Credentials::AccessToken(_)));
    }

    #[test]
    fn test_builder_missing_property() {
        let result = GatewayConfig::builder().access_token("tok").build();
        assert!(matches!(result, Err(ConfigError::PropertyIdMissing)));
    }

    #[test]
    fn test_builder_blank_property() {
        for id in ["", "   "] {
            let result = GatewayConfig::builder()
                .property_id(id)
                .access_token("tok")
                .build();
            assert!(matches!(result, Err(ConfigError::PropertyIdMissing)));
        }
    }

    #[test]
    fn test_builder_missing_credentials() {
        let result = GatewayConfig::builder().property_id("123").build();
        assert!(matches!(result, Err(ConfigError::CredentialsMissing)));
    }

    #[test]
    fn test_inline_key_unescapes_newlines() {
        let config = GatewayConfig::builder()
            .property_id("123")
            .service_account("sa@example.iam.gserviceaccount.com", "line1\\nline2")
            .build()
            .unwrap_or_else(|_| unreachable!());
        let Credentials::ServiceAccount(key) = config.credentials else {
            unreachable!("expected service account credentials");
        };
        assert_eq!(key.private_key, "line1\nline2");
        assert_eq!(key.token_uri, crate::analytics::auth::DEFAULT_TOKEN_URI);
    }

    #[test]
    fn test_key_file_wins_over_token() {
        let mut file = tempfile::NamedTempFile::new().unwrap_or_else(|_| unreachable!());
        write!(
            file,
            r#"{{"client_email":"sa@example.com","private_key":"pem","token_uri":"http://localhost/token"}}"#
        )
        .unwrap_or_else(|_| unreachable!());

        let config = GatewayConfig::builder()
            .property_id("123")
            .credentials_file(file.path())
            .access_token("ignored")
            .build()
            .unwrap_or_else(|_| unreachable!());
        let Credentials::ServiceAccount(key) = config.credentials else {
            unreachable!("expected service account credentials");
        };
        assert_eq!(key.client_email, "sa@example.com");
        assert_eq!(key.token_uri, "http://localhost/token");
    }

    #[test]
    fn test_unreadable_key_file() {
        let result = GatewayConfig::builder()
            .property_id("123")
            .credentials_file("/nonexistent/ga4-key.json")
            .build();
        assert!(matches!(result, Err(ConfigError::CredentialsFile { .. })));
    }

    #[test]
    fn test_dimension_source_parse() {
        assert_eq!("metadata".parse::<DimensionSource>().ok(), Some(DimensionSource::Metadata));
        assert_eq!("Dynamic".parse::<DimensionSource>().ok(), Some(DimensionSource::Metadata));
        assert_eq!("builtin".parse::<DimensionSource>().ok(), Some(DimensionSource::Builtin));
        assert!("other".parse::<DimensionSource>().is_err());

        let result = GatewayConfig::builder()
            .property_id("1")
            .access_token("t")
            .dimension_source("nope")
            .build();
        assert!(matches!(result, Err(ConfigError::DimensionSource { .. })));
    }
}
