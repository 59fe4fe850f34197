//! Tool executor that forwards model tool calls to the report gateway.
//!
//! Each call becomes one MCP `tools/call` on the open gateway session.
//! Failures of any kind come back as error-tagged [`ToolResult`]s so the
//! model can react to them; they never abort the agentic loop.

use async_trait::async_trait;
use rmcp::model::CallToolResult;
use rmcp::{Peer, RoleClient};
use serde_json::{Map, Value, json};
use tracing::warn;

use super::tool::{ToolCall, ToolResult, ToolSet};
use crate::error::AgentError;

/// Maximum raw byte length of tool argument JSON from the LLM.
const MAX_TOOL_ARGS_LEN: usize = 100_000;

/// Executes tool calls on behalf of the agentic loop.
#[async_trait]
pub trait ToolDispatcher: Send + Sync {
    /// Runs `call` and returns its result. Never fails: errors are tagged.
    async fn dispatch(&self, call: &ToolCall) -> ToolResult;
}

/// Parses the model's JSON argument string into an MCP argument object.
///
/// An empty string means no arguments.
fn parse_arguments(call: &ToolCall) -> Result<Map<String, Value>, AgentError> {
    let invalid = |message: String| AgentError::ToolExecution {
        name: call.name.clone(),
        message,
    };

    if call.arguments.len() > MAX_TOOL_ARGS_LEN {
        return Err(invalid(format!(
            "tool arguments too large ({} bytes, max {MAX_TOOL_ARGS_LEN})",
            call.arguments.len()
        )));
    }
    if call.arguments.trim().is_empty() {
        return Ok(Map::new());
    }

    match serde_json::from_str(&call.arguments) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(invalid(format!("arguments must be a JSON object, got {other}"))),
        Err(e) => Err(invalid(format!("invalid JSON arguments: {e}"))),
    }
}

/// Joins the text entries of an MCP tool result, one per line.
fn render(result: &CallToolResult) -> String {
    result
        .content
        .iter()
        .filter_map(|c| c.as_text().map(|t| t.text.as_str()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Dispatches tool calls to the report gateway over MCP.
#[derive(Clone)]
pub struct McpToolExecutor {
    peer: Peer<RoleClient>,
    tools: ToolSet,
}

impl McpToolExecutor {
    /// Creates an executor over a connected gateway session.
    ///
    /// `tools` is the discovered capability set; calls to other names are
    /// rejected without a round trip.
    #[must_use]
    pub const fn new(peer: Peer<RoleClient>, tools: ToolSet) -> Self {
        Self { peer, tools }
    }

    async fn call(&self, call: &ToolCall) -> Result<ToolResult, AgentError> {
        if !self.tools.contains(&call.name) {
            return Err(AgentError::ToolExecution {
                name: call.name.clone(),
                message: "unknown tool".to_string(),
            });
        }

        let arguments = parse_arguments(call)?;
        let params = serde_json::from_value(json!({
            "name": call.name,
            "arguments": arguments,
        }))
        .map_err(|e| AgentError::ToolExecution {
            name: call.name.clone(),
            message: e.to_string(),
        })?;

        let result = self
            .peer
            .call_tool(params)
            .await
            .map_err(|e| AgentError::ToolExecution {
                name: call.name.clone(),
                message: e.to_string(),
            })?;

        Ok(ToolResult {
            tool_call_id: call.id.clone(),
            content: render(&result),
            is_error: result.is_error.unwrap_or(false),
        })
    }
}

#[async_trait]
impl ToolDispatcher for McpToolExecutor {
    async fn dispatch(&self, call: &ToolCall) -> ToolResult {
        match self.call(call).await {
            Ok(result) => result,
            Err(e) => {
                warn!(tool = %call.name, error = %e, "tool call failed");
                ToolResult::error(call, e.to_string())
            }
        }
    }
}

impl std::fmt::Debug for McpToolExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McpToolExecutor")
            .field("tools", &self.tools.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::agent::discovery::tests::{StubBackend, in_process_session};
    use crate::core::FilterExpression;
    use rmcp::model::Content;

    fn call(arguments: &str) -> ToolCall {
        ToolCall {
            id: "call_1".to_string(),
            name: "get_active_users".to_string(),
            arguments: arguments.to_string(),
        }
    }

    #[test]
    fn test_parse_object_arguments() {
        let args = parse_arguments(&call(
            r#"{"start_date":"2024-01-01","end_date":"2024-01-31","dimensions":["country"]}"#,
        ))
        .unwrap_or_else(|e| panic!("parse: {e}"));
        assert_eq!(args["start_date"], "2024-01-01");
        assert_eq!(args["dimensions"], json!(["country"]));
    }

    #[test]
    fn test_empty_arguments_are_empty_object() {
        let args = parse_arguments(&call("  ")).unwrap_or_else(|e| panic!("parse: {e}"));
        assert!(args.is_empty());
    }

    #[test]
    fn test_rejects_non_object_arguments() {
        assert!(matches!(
            parse_arguments(&call("[1,2]")),
            Err(AgentError::ToolExecution { .. })
        ));
        assert!(matches!(
            parse_arguments(&call("{not json")),
            Err(AgentError::ToolExecution { .. })
        ));
    }

    #[test]
    fn test_rejects_oversized_arguments() {
        let big = format!(r#"{{"x":"{}"}}"#, "a".repeat(MAX_TOOL_ARGS_LEN));
        let err = parse_arguments(&call(&big)).err();
        assert!(err.is_some_and(|e| e.to_string().contains("too large")));
    }

    #[test]
    fn test_render_joins_text_entries() {
        let result = CallToolResult::success(vec![
            Content::text("country: France, activeUsers: 12"),
            Content::text("country: Chile, activeUsers: 3"),
        ]);
        assert_eq!(
            render(&result),
            "country: France, activeUsers: 12\ncountry: Chile, activeUsers: 3"
        );
    }

    fn report_call(name: &str, arguments: serde_json::Value) -> ToolCall {
        ToolCall {
            id: "call_7".to_string(),
            name: name.to_string(),
            arguments: arguments.to_string(),
        }
    }

    #[tokio::test]
    async fn test_forwards_call_to_gateway() {
        let backend = StubBackend::new(false);
        let session = in_process_session(backend.clone()).await;
        let tools = session
            .tool_set()
            .await
            .unwrap_or_else(|e| panic!("tool set: {e}"));
        let executor = McpToolExecutor::new(session.peer(), tools);

        let result = executor
            .dispatch(&report_call(
                "get_active_users",
                json!({
                    "start_date": "2024-01-01",
                    "end_date": "2024-01-31",
                    "dimensions": ["country", "foo"],
                    "filters": {"deviceCategory": "mobile", "foo": "x", "country": "France"}
                }),
            ))
            .await;
        session.close().await;

        assert_eq!(result.tool_call_id, "call_7");
        assert_eq!(result.content, "country: France, activeUsers: 12");
        assert!(!result.is_error);

        let requests = backend.requests();
        assert_eq!(requests.len(), 1);
        let dimensions: Vec<&str> = requests[0].dimension_names().collect();
        assert_eq!(dimensions, vec!["country"]);
        let Some(FilterExpression::And(predicates)) = &requests[0].dimension_filter else {
            panic!("expected an AND filter, got {:?}", requests[0].dimension_filter);
        };
        let fields: Vec<&str> = predicates.iter().map(|p| p.field.as_str()).collect();
        assert_eq!(fields, vec!["deviceCategory", "country"]);
    }

    #[tokio::test]
    async fn test_backend_failure_is_tagged() {
        let session = in_process_session(StubBackend::new(true)).await;
        let tools = session
            .tool_set()
            .await
            .unwrap_or_else(|e| panic!("tool set: {e}"));
        let executor = McpToolExecutor::new(session.peer(), tools);

        let result = executor
            .dispatch(&report_call(
                "get_active_users",
                json!({"start_date": "yesterday", "end_date": "today"}),
            ))
            .await;
        session.close().await;

        assert!(result.is_error);
        assert_eq!(result.content, "Error: GA4 API error (403): denied");
    }

    #[tokio::test]
    async fn test_unknown_tool_stays_local() {
        let backend = StubBackend::new(false);
        let session = in_process_session(backend.clone()).await;
        let tools = session
            .tool_set()
            .await
            .unwrap_or_else(|e| panic!("tool set: {e}"));
        let executor = McpToolExecutor::new(session.peer(), tools);

        let result = executor
            .dispatch(&report_call(
                "get_sessions",
                json!({"start_date": "yesterday", "end_date": "today"}),
            ))
            .await;
        session.close().await;

        assert!(result.is_error);
        assert!(result.content.contains("unknown tool"));
        assert!(backend.requests().is_empty());
    }
}
