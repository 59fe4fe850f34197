//! Error types for ga4-mcp.
//!
//! Each layer owns a `thiserror` enum; [`Error`] wraps them for the CLI.
//! Report tool handlers never surface these to MCP callers directly: backend
//! failures are rendered into a single error-tagged text entry instead.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Analytics backend failure.
    #[error(transparent)]
    Analytics(#[from] AnalyticsError),

    /// Configuration failure.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Agent failure.
    #[error(transparent)]
    Agent(#[from] AgentError),

    /// CLI command failure.
    #[error(transparent)]
    Command(#[from] CommandError),
}

/// Errors raised while talking to the GA4 Data API.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// The service-account key could not be used to sign an assertion.
    #[error("invalid service account credentials: {message}")]
    Credentials {
        /// What was wrong with the key.
        message: String,
    },

    /// The OAuth token endpoint rejected the assertion or was unreachable.
    #[error("token exchange failed: {message}")]
    TokenExchange {
        /// Failure detail.
        message: String,
    },

    /// The HTTP request could not be completed.
    #[error("request to {url} failed: {message}")]
    Transport {
        /// Request URL.
        url: String,
        /// Failure detail.
        message: String,
    },

    /// The API answered with a non-success status.
    #[error("GA4 API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the API error body, or the raw body.
        message: String,
    },

    /// The API response body did not match the expected shape.
    #[error("failed to decode GA4 response: {message}")]
    Decode {
        /// Decoder error.
        message: String,
    },
}

/// Configuration errors, raised before the gateway starts serving.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No GA4 property was configured.
    #[error("GA4 property id is required (set GA4_PROPERTY_ID or --property-id)")]
    PropertyIdMissing,

    /// No credentials were configured.
    #[error(
        "GA4 credentials are required (set GA4_CREDENTIALS_FILE, GA4_CLIENT_EMAIL + GA4_PRIVATE_KEY, or GA4_ACCESS_TOKEN)"
    )]
    CredentialsMissing,

    /// The credentials file could not be read or parsed.
    #[error("failed to load credentials from {path}: {message}")]
    CredentialsFile {
        /// Path that was read.
        path: String,
        /// Failure detail.
        message: String,
    },

    /// An unknown dimension source name was given.
    #[error("unknown dimension source '{name}' (expected 'builtin' or 'metadata')")]
    DimensionSource {
        /// The rejected value.
        name: String,
    },
}

/// Errors raised by the agent side: provider calls, discovery, tool loop.
#[derive(Debug, Error)]
pub enum AgentError {
    /// No API key was configured for the LLM provider.
    #[error("LLM API key is required (set GA4_AGENT_API_KEY, GEMINI_API_KEY or OPENAI_API_KEY)")]
    ApiKeyMissing,

    /// The configured provider name is not known.
    #[error("unsupported LLM provider: {name}")]
    UnsupportedProvider {
        /// Provider name.
        name: String,
    },

    /// The chat-completions request failed.
    #[error("LLM API request failed: {message}")]
    ApiRequest {
        /// Failure detail.
        message: String,
        /// HTTP status, when known.
        status: Option<u16>,
    },

    /// Connecting to the gateway or listing its tools failed.
    #[error("tool discovery from {url} failed: {message}")]
    Discovery {
        /// Gateway endpoint.
        url: String,
        /// Failure detail.
        message: String,
    },

    /// A tool call could not be executed.
    #[error("tool '{name}' failed: {message}")]
    ToolExecution {
        /// Tool name.
        name: String,
        /// Failure detail.
        message: String,
    },

    /// The model kept requesting tools past the iteration limit.
    #[error("tool loop exceeded {max_iterations} iterations")]
    ToolLoopExceeded {
        /// Configured limit.
        max_iterations: usize,
    },
}

/// CLI command errors.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Generic command failure.
    #[error("{0}")]
    ExecutionFailed(String),

    /// Reading from stdin or writing to stdout failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
