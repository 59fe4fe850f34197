//! Agent trait definition.
//!
//! An agent is a fixed role: a model, a system prompt, and the tools it may
//! call. [`execute_with_tools`] runs one turn of a conversation for it.

use tracing::debug;

use super::agentic_loop::agentic_loop;
use super::executor::ToolDispatcher;
use super::message::{ChatMessage, ChatRequest, TokenUsage, assistant_message, system_message};
use super::provider::LlmProvider;
use super::tool::ToolDefinition;
use crate::error::AgentError;

/// Response from an agent execution.
#[derive(Debug, Clone)]
pub struct AgentResponse {
    /// The agent's text output.
    pub content: String,
    /// Token usage for this turn, summed over every model call.
    pub usage: TokenUsage,
    /// Why the model stopped generating (e.g. `"stop"`, `"length"`).
    pub finish_reason: Option<String>,
}

/// Trait implemented by agents.
///
/// Agents encapsulate a specific role with a fixed system prompt and model
/// configuration. Agents that support tool-calling override
/// [`Agent::tools`] to return their available tool definitions.
pub trait Agent: Send + Sync {
    /// Agent name for logging and identification.
    fn name(&self) -> &'static str;

    /// Model identifier to use for this agent.
    fn model(&self) -> &str;

    /// System prompt that defines the agent's role and behavior.
    fn system_prompt(&self) -> &str;

    /// Sampling temperature (0.0 = deterministic, higher = more creative).
    fn temperature(&self) -> f32 {
        0.0
    }

    /// Maximum tokens for the response.
    fn max_tokens(&self) -> u32 {
        2048
    }

    /// Tool definitions available to this agent.
    fn tools(&self) -> Vec<ToolDefinition> {
        Vec::new()
    }

    /// Maximum tool-calling loop iterations before aborting.
    fn max_tool_iterations(&self) -> usize {
        10
    }
}

/// Runs one conversational turn for `agent`.
///
/// `messages` is the conversation without the system prompt and must end
/// with the user's message; the agent's system prompt is sent ahead of it.
/// On success the tool-call exchange and the final assistant message are
/// appended to it; on failure it holds whatever the loop appended before
/// failing.
///
/// # Errors
///
/// Returns [`AgentError`] on API failures or if the tool loop exceeds the
/// agent's max iterations.
pub async fn execute_with_tools(
    agent: &dyn Agent,
    provider: &dyn LlmProvider,
    messages: &mut Vec<ChatMessage>,
    dispatcher: &dyn ToolDispatcher,
) -> Result<AgentResponse, AgentError> {
    let mut conversation = Vec::with_capacity(messages.len() + 1);
    conversation.push(system_message(agent.system_prompt()));
    conversation.append(messages);

    let mut request = ChatRequest {
        model: agent.model().to_string(),
        messages: conversation,
        temperature: Some(agent.temperature()),
        max_tokens: Some(agent.max_tokens()),
        tools: agent.tools(),
    };
    debug!(
        agent = agent.name(),
        model = %request.model,
        tools = request.tools.len(),
        "starting turn"
    );

    let outcome = agentic_loop(
        provider,
        &mut request,
        dispatcher,
        agent.max_tool_iterations(),
    )
    .await;
    messages.extend(request.messages.into_iter().skip(1));

    let response = outcome?;
    messages.push(assistant_message(&response.content));

    Ok(AgentResponse {
        content: response.content,
        usage: response.usage,
        finish_reason: response.finish_reason,
    })
}
