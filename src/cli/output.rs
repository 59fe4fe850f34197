//! Output formatting for CLI commands.

use rmcp::model::Tool;
use serde::Serialize;
use std::fmt::Write as _;

use crate::agent::AgentResponse;

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

impl OutputFormat {
    /// Parses a format name; anything other than `json` is text.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    /// Serializes `value` as pretty JSON.
    #[must_use]
    pub fn to_json<T: Serialize>(self, value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
    }
}

#[derive(Serialize)]
struct ToolSummary<'a> {
    name: &'a str,
    description: &'a str,
}

/// Formats a gateway tool listing.
#[must_use]
pub fn format_tools(tools: &[Tool], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            let mut output = String::new();
            for tool in tools {
                let description = tool.description.as_deref().unwrap_or_default();
                let summary = description.lines().next().unwrap_or_default();
                let _ = writeln!(output, "{:<28} {summary}", tool.name);
            }
            let _ = write!(output, "\n{} tool(s)", tools.len());
            output
        }
        OutputFormat::Json => {
            let summaries: Vec<ToolSummary<'_>> = tools
                .iter()
                .map(|t| ToolSummary {
                    name: &t.name,
                    description: t.description.as_deref().unwrap_or_default(),
                })
                .collect();
            format.to_json(&summaries)
        }
    }
}

/// Formats an assistant answer.
#[must_use]
pub fn format_answer(response: &AgentResponse, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => response.content.clone(),
        OutputFormat::Json => format.to_json(&serde_json::json!({
            "answer": response.content,
            "finish_reason": response.finish_reason,
            "usage": {
                "prompt_tokens": response.usage.prompt_tokens,
                "completion_tokens": response.usage.completion_tokens,
                "total_tokens": response.usage.total_tokens,
            },
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::TokenUsage;
    use serde_json::json;

    fn tool(name: &str, description: &str) -> Tool {
        serde_json::from_value(json!({
            "name": name,
            "description": description,
            "inputSchema": { "type": "object" }
        }))
        .unwrap_or_else(|_| unreachable!())
    }

    #[test]
    fn test_parse() {
        assert_eq!(OutputFormat::parse("json"), OutputFormat::Json);
        assert_eq!(OutputFormat::parse("JSON"), OutputFormat::Json);
        assert_eq!(OutputFormat::parse("text"), OutputFormat::Text);
        assert_eq!(OutputFormat::parse("yaml"), OutputFormat::Text);
    }

    #[test]
    fn test_format_tools_text() {
        let tools = vec![
            tool("get_active_users", "Active users.\nMore detail."),
            tool("list_supported_dimensions", "Dimension names"),
        ];
        let output = format_tools(&tools, OutputFormat::Text);
        assert!(output.contains("get_active_users"));
        assert!(output.contains("Active users."));
        assert!(!output.contains("More detail."));
        assert!(output.ends_with("2 tool(s)"));
    }

    #[test]
    fn test_format_tools_json() {
        let tools = vec![tool("get_active_users", "Active users")];
        let output = format_tools(&tools, OutputFormat::Json);
        let value: serde_json::Value =
            serde_json::from_str(&output).unwrap_or_else(|_| unreachable!());
        assert_eq!(value[0]["name"], "get_active_users");
        assert_eq!(value[0]["description"], "Active users");
    }

    #[test]
    fn test_format_answer_json() {
        let response = AgentResponse {
            content: "1,204 active users".to_string(),
            usage: TokenUsage {
                prompt_tokens: 100,
                completion_tokens: 20,
                total_tokens: 120,
            },
            finish_reason: Some("stop".to_string()),
        };
        assert_eq!(
            format_answer(&response, OutputFormat::Text),
            "1,204 active users"
        );
        let value: serde_json::Value =
            serde_json::from_str(&format_answer(&response, OutputFormat::Json))
                .unwrap_or_else(|_| unreachable!());
        assert_eq!(value["answer"], "1,204 active users");
        assert_eq!(value["usage"]["total_tokens"], 120);
    }
}
