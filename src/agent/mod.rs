//! Agent wiring for the report gateway.
//!
//! Connects to a running gateway over MCP, discovers its tools once, and
//! hands them to a single conversational agent (`analytics_assistant`)
//! backed by an OpenAI-compatible chat-completions provider.
//!
//! # Architecture
//!
//! ```text
//! startup
//!   GatewaySession::connect(url) → list_tools() → ToolSet
//!   AnalyticsAssistant::new(config, tool_set)
//!
//! each question
//!   AnalyticsAssistant::ask
//!     └── agentic_loop
//!           ├── LlmProvider::chat (Gemini / OpenAI)
//!           └── McpToolExecutor::dispatch → gateway tools/call
//! ```

pub mod agentic_loop;
pub mod assistant;
pub mod client;
pub mod config;
pub mod discovery;
pub mod executor;
pub mod message;
pub mod prompt;
pub mod provider;
pub mod providers;
pub mod tool;
pub mod traits;

// Re-export key types
pub use assistant::{ASSISTANT_NAME, AnalyticsAssistant};
pub use client::create_provider;
pub use config::AgentConfig;
pub use discovery::GatewaySession;
pub use executor::{McpToolExecutor, ToolDispatcher};
pub use message::{ChatMessage, ChatRequest, ChatResponse, Role, TokenUsage};
pub use prompt::ANALYTICS_ASSISTANT_PROMPT;
pub use provider::LlmProvider;
pub use tool::{ToolCall, ToolDefinition, ToolResult, ToolSet};
pub use traits::{Agent, AgentResponse, execute_with_tools};
