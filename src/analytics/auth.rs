//! Service-account credentials and OAuth access tokens for the GA4 Data API.
//!
//! A service account signs a short-lived RS256 JWT assertion and trades it
//! at the token endpoint for a bearer token. Tokens are cached until shortly
//! before they expire; a pre-minted token can be used instead for local runs.

use std::path::Path;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{AnalyticsError, ConfigError};

/// Google's OAuth 2.0 token endpoint.
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
/// Read-only Analytics scope; reports never need more.
pub const ANALYTICS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/analytics.readonly";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
/// Lifetime requested for signed assertions (Google's maximum).
const ASSERTION_LIFETIME_SECS: u64 = 3600;
/// Tokens are refreshed this long before their advertised expiry.
const REFRESH_MARGIN: Duration = Duration::from_secs(60);

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// The fields of a service-account JSON key that token minting needs.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    /// Service account email, used as the assertion issuer.
    pub client_email: String,
    /// PEM-encoded RSA private key.
    pub private_key: String,
    /// Token endpoint the assertion is exchanged at.
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl ServiceAccountKey {
    /// Creates a key from its parts.
    pub fn new(
        client_email: impl Into<String>,
        private_key: impl Into<String>,
        token_uri: Option<String>,
    ) -> Self {
        Self {
            client_email: client_email.into(),
            private_key: private_key.into(),
            token_uri: token_uri.unwrap_or_else(default_token_uri),
        }
    }

    /// Parses a downloaded service-account key file.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Reads and parses a service-account key file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let to_err = |message: String| ConfigError::CredentialsFile {
            path: path.display().to_string(),
            message,
        };
        let json = std::fs::read_to_string(path).map_err(|e| to_err(e.to_string()))?;
        Self::from_json(&json).map_err(|e| to_err(e.to_string()))
    }
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

/// How the gateway authenticates to the GA4 Data API.
#[derive(Clone)]
pub enum Credentials {
    /// Mint tokens from a service-account key.
    ServiceAccount(ServiceAccountKey),
    /// Use a fixed bearer token (e.g. from `gcloud auth print-access-token`).
    AccessToken(String),
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ServiceAccount(key) => f.debug_tuple("ServiceAccount").field(key).finish(),
            Self::AccessToken(_) => f.debug_tuple("AccessToken").field(&"<redacted>").finish(),
        }
    }
}

#[derive(Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: u64,
    exp: u64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    refresh_at: Instant,
}

/// Hands out bearer tokens, minting and caching them as needed.
pub struct TokenProvider {
    credentials: Credentials,
    http: reqwest::Client,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenProvider {
    /// Creates a provider that uses `http` for token exchanges.
    #[must_use]
    pub fn new(credentials: Credentials, http: reqwest::Client) -> Self {
        Self {
            credentials,
            http,
            cached: Mutex::new(None),
        }
    }

    /// Returns a valid bearer token.
    ///
    /// Concurrent callers wait on the same refresh instead of each
    /// exchanging their own assertion.
    pub async fn access_token(&self) -> Result<String, AnalyticsError> {
        let key = match &self.credentials {
            Credentials::AccessToken(token) => return Ok(token.clone()),
            Credentials::ServiceAccount(key) => key,
        };

        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref()
            && Instant::now() < token.refresh_at
        {
            return Ok(token.value.clone());
        }

        let token = self.exchange(key).await?;
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }

    async fn exchange(&self, key: &ServiceAccountKey) -> Result<CachedToken, AnalyticsError> {
        let assertion = sign_assertion(key, unix_now())?;
        debug!(issuer = %key.client_email, token_uri = %key.token_uri, "exchanging service account assertion");

        let response = self
            .http
            .post(&key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| AnalyticsError::TokenExchange {
                message: e.to_string(),
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AnalyticsError::TokenExchange {
                message: e.to_string(),
            })?;

        if !status.is_success() {
            return Err(AnalyticsError::TokenExchange {
                message: format!("{status}: {body}"),
            });
        }

        let token: TokenResponse =
            serde_json::from_str(&body).map_err(|e| AnalyticsError::TokenExchange {
                message: format!("unexpected token response: {e}"),
            })?;

        let lifetime = Duration::from_secs(token.expires_in.unwrap_or(ASSERTION_LIFETIME_SECS));
        Ok(CachedToken {
            value: token.access_token,
            refresh_at: Instant::now() + lifetime.saturating_sub(REFRESH_MARGIN),
        })
    }
}

impl std::fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenProvider")
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}

/// Signs the RS256 JWT assertion for `key`, issued at `now` (Unix seconds).
fn sign_assertion(key: &ServiceAccountKey, now: u64) -> Result<String, AnalyticsError> {
    let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes()).map_err(|e| {
        AnalyticsError::Credentials {
            message: format!("private key is not a valid RSA PEM: {e}"),
        }
    })?;

    let claims = AssertionClaims {
        iss: &key.client_email,
        scope: ANALYTICS_READONLY_SCOPE,
        aud: &key.token_uri,
        iat: now,
        exp: now + ASSERTION_LIFETIME_SECS,
    };

    jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &encoding_key).map_err(|e| {
        AnalyticsError::Credentials {
            message: format!("failed to sign assertion: {e}"),
        }
    })
}
