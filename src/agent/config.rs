//! Agent configuration with builder pattern and environment variable support.
//!
//! Configuration is resolved in order: explicit values → environment variables → defaults.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::AgentError;

/// Default LLM provider.
pub const DEFAULT_PROVIDER: &str = "gemini";
/// Default chat model.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
/// Default report gateway endpoint.
pub const DEFAULT_GATEWAY_URL: &str = "http://localhost:8080/mcp";
/// Default max tokens per model response.
const DEFAULT_MAX_TOKENS: u32 = 2048;
/// Default maximum tool-calling loop iterations.
const DEFAULT_MAX_TOOL_ITERATIONS: usize = 10;
/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Configuration for the analytics assistant.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// LLM provider name (`gemini` or `openai`).
    pub provider: String,
    /// API key for the provider.
    pub api_key: String,
    /// Optional base URL override (for proxies or compatible APIs).
    pub base_url: Option<String>,
    /// Chat model identifier.
    pub model: String,
    /// MCP endpoint of the report gateway.
    pub gateway_url: String,
    /// Maximum tokens per model response.
    pub max_tokens: u32,
    /// Maximum tool-calling loop iterations before aborting.
    pub max_tool_iterations: usize,
    /// Request timeout for gateway connections.
    pub timeout: Duration,
    /// File whose contents replace the built-in assistant instruction.
    pub prompt_file: Option<PathBuf>,
}

impl AgentConfig {
    /// Creates a new builder for `AgentConfig`.
    #[must_use]
    pub fn builder() -> AgentConfigBuilder {
        AgentConfigBuilder::default()
    }

    /// Creates configuration from environment variables with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::ApiKeyMissing`] if no API key is found.
    pub fn from_env() -> Result<Self, AgentError> {
        Self::builder().from_env().build()
    }
}

/// Builder for [`AgentConfig`].
#[derive(Debug, Clone, Default)]
pub struct AgentConfigBuilder {
    provider: Option<String>,
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    gateway_url: Option<String>,
    max_tokens: Option<u32>,
    max_tool_iterations: Option<usize>,
    timeout: Option<Duration>,
    prompt_file: Option<PathBuf>,
}

impl AgentConfigBuilder {
    /// Populates unset fields from environment variables.
    #[must_use]
    pub fn from_env(mut self) -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        if self.provider.is_none() {
            self.provider = var("GA4_AGENT_PROVIDER");
        }
        if self.api_key.is_none() {
            self.api_key = var("GA4_AGENT_API_KEY")
                .or_else(|| var("GEMINI_API_KEY"))
                .or_else(|| var("OPENAI_API_KEY"));
        }
        if self.base_url.is_none() {
            self.base_url = var("GA4_AGENT_BASE_URL");
        }
        if self.model.is_none() {
            self.model = var("GA4_AGENT_MODEL");
        }
        if self.gateway_url.is_none() {
            self.gateway_url = var("GA4_GATEWAY_URL");
        }
        if self.max_tokens.is_none() {
            self.max_tokens = var("GA4_AGENT_MAX_TOKENS").and_then(|v| v.parse().ok());
        }
        if self.max_tool_iterations.is_none() {
            self.max_tool_iterations =
                var("GA4_AGENT_MAX_TOOL_ITERATIONS").and_then(|v| v.parse().ok());
        }
        if self.prompt_file.is_none() {
            self.prompt_file = var("GA4_AGENT_PROMPT_FILE").map(PathBuf::from);
        }
        self
    }

    /// Sets the LLM provider name.
    #[must_use]
    pub fn provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Sets the API key.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the base URL override.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the chat model.
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the report gateway endpoint.
    #[must_use]
    pub fn gateway_url(mut self, url: impl Into<String>) -> Self {
        self.gateway_url = Some(url.into());
        self
    }

    /// Sets the max tokens per response.
    #[must_use]
    pub const fn max_tokens(mut self, n: u32) -> Self {
        self.max_tokens = Some(n);
        self
    }

    /// Sets the maximum tool-calling loop iterations.
    #[must_use]
    pub const fn max_tool_iterations(mut self, n: usize) -> Self {
        self.max_tool_iterations = Some(n);
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Sets the instruction override file.
    #[must_use]
    pub fn prompt_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.prompt_file = Some(path.into());
        self
    }

    /// Builds the [`AgentConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::ApiKeyMissing`] if no API key was set.
    pub fn build(self) -> Result<AgentConfig, AgentError> {
        let api_key = self.api_key.ok_or(AgentError::ApiKeyMissing)?;

        Ok(AgentConfig {
            provider: self
                .provider
                .map_or_else(|| DEFAULT_PROVIDER.to_string(), |p| p.to_lowercase()),
            api_key,
            base_url: self.base_url,
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            gateway_url: self
                .gateway_url
                .unwrap_or_else(|| DEFAULT_GATEWAY_URL.to_string()),
            max_tokens: self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            max_tool_iterations: self
                .max_tool_iterations
                .unwrap_or(DEFAULT_MAX_TOOL_ITERATIONS),
            timeout: self
                .timeout
                .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            prompt_file: self.prompt_file,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = AgentConfig::builder()
            .api_key("test-key")
            .build()
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(config.provider, "gemini");
        assert_eq!(config.api_key, "test-key");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.gateway_url, DEFAULT_GATEWAY_URL);
        assert_eq!(config.max_tokens, DEFAULT_MAX_TOKENS);
        assert_eq!(config.max_tool_iterations, DEFAULT_MAX_TOOL_ITERATIONS);
        assert!(config.base_url.is_none());
        assert!(config.prompt_file.is_none());
    }

    #[test]
    fn test_builder_missing_api_key() {
        let result = AgentConfig::builder().build();
        assert!(matches!(result, Err(AgentError::ApiKeyMissing)));
    }

    #[test]
    fn test_builder_custom_values() {
        let config = AgentConfig::builder()
            .api_key("key")
            .provider("OpenAI")
            .model("gpt-4o-mini")
            .gateway_url("http://10.0.0.5:9000/mcp")
            .max_tokens(512)
            .max_tool_iterations(3)
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(config.provider, "openai");
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.gateway_url, "http://10.0.0.5:9000/mcp");
        assert_eq!(config.max_tokens, 512);
        assert_eq!(config.max_tool_iterations, 3);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }
}
