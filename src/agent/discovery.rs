//! One-shot tool discovery against the report gateway.
//!
//! The assistant connects once at startup, lists the gateway's tools once,
//! and keeps the session open for tool calls. There is no re-discovery or
//! reconnection; any failure here is fatal to the caller.

use std::time::Duration;

use rmcp::model::Tool;
use rmcp::service::RunningService;
use rmcp::transport::{IntoTransport, StreamableHttpClientTransport};
use rmcp::{Peer, RoleClient, ServiceExt};
use tracing::{debug, info};

use super::tool::ToolSet;
use crate::error::AgentError;

/// An open MCP client session with the report gateway.
pub struct GatewaySession {
    url: String,
    service: RunningService<RoleClient, ()>,
}

impl GatewaySession {
    /// Connects to the gateway's streamable HTTP endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Discovery`] if the MCP handshake fails or does
    /// not finish within `timeout`.
    pub async fn connect(url: &str, timeout: Duration) -> Result<Self, AgentError> {
        let transport = StreamableHttpClientTransport::from_uri(url.to_string());
        Self::start(url, transport, timeout).await
    }

    /// Runs the MCP handshake over `transport`; `url` names the endpoint in
    /// logs and errors.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Discovery`] if the handshake fails or does not
    /// finish within `timeout`.
    pub async fn start<T, E, A>(
        url: &str,
        transport: T,
        timeout: Duration,
    ) -> Result<Self, AgentError>
    where
        T: IntoTransport<RoleClient, E, A>,
        E: std::error::Error + Send + Sync + 'static,
    {
        let discovery = |message: String| AgentError::Discovery {
            url: url.to_string(),
            message,
        };

        let service = tokio::time::timeout(timeout, ().serve(transport))
            .await
            .map_err(|_| discovery(format!("no response within {}s", timeout.as_secs())))?
            .map_err(|e| discovery(e.to_string()))?;

        debug!(url, "connected to report gateway");
        Ok(Self {
            url: url.to_string(),
            service,
        })
    }

    /// Lists every tool the gateway publishes.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Discovery`] if the listing request fails.
    pub async fn list_tools(&self) -> Result<Vec<Tool>, AgentError> {
        let tools = self
            .service
            .list_all_tools()
            .await
            .map_err(|e| AgentError::Discovery {
                url: self.url.clone(),
                message: e.to_string(),
            })?;
        info!(url = %self.url, tools = tools.len(), "discovered gateway tools");
        Ok(tools)
    }

    /// Lists the gateway's tools as the assistant's capability set.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Discovery`] if the listing request fails.
    pub async fn tool_set(&self) -> Result<ToolSet, AgentError> {
        self.list_tools().await.map(ToolSet::from_mcp)
    }

    /// Handle for issuing tool calls on this session.
    #[must_use]
    pub fn peer(&self) -> Peer<RoleClient> {
        self.service.peer().clone()
    }

    /// The endpoint this session is connected to.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Closes the session.
    pub async fn close(self) {
        if let Err(e) = self.service.cancel().await {
            debug!(error = %e, "gateway session did not shut down cleanly");
        }
    }
}

impl std::fmt::Debug for GatewaySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewaySession")
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}
