//! The `analytics_assistant` agent.
//!
//! A single conversational agent whose tools are exactly the ones the
//! report gateway published at startup. It keeps the conversation so
//! follow-up questions see earlier answers.

use tracing::{info, warn};

use super::config::AgentConfig;
use super::executor::ToolDispatcher;
use super::message::{ChatMessage, user_message};
use super::prompt::load_instruction;
use super::provider::LlmProvider;
use super::tool::{ToolDefinition, ToolSet};
use super::traits::{Agent, AgentResponse, execute_with_tools};
use crate::error::AgentError;

/// Registered agent name.
pub const ASSISTANT_NAME: &str = "analytics_assistant";

/// Conversational GA4 assistant.
#[derive(Debug, Clone)]
pub struct AnalyticsAssistant {
    model: String,
    instruction: String,
    max_tokens: u32,
    max_tool_iterations: usize,
    tools: ToolSet,
    history: Vec<ChatMessage>,
}

impl AnalyticsAssistant {
    /// Creates the assistant with the discovered `tools`.
    #[must_use]
    pub fn new(config: &AgentConfig, tools: ToolSet) -> Self {
        let instruction = load_instruction(config.prompt_file.as_deref());
        info!(
            agent = ASSISTANT_NAME,
            model = %config.model,
            tools = tools.len(),
            "assistant ready"
        );
        Self {
            model: config.model.clone(),
            instruction,
            max_tokens: config.max_tokens,
            max_tool_iterations: config.max_tool_iterations,
            tools,
            history: Vec::new(),
        }
    }

    /// The assistant's capability set.
    #[must_use]
    pub const fn tool_set(&self) -> &ToolSet {
        &self.tools
    }

    /// Messages exchanged so far. The instruction is sent separately.
    #[must_use]
    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// Forgets the conversation, keeping the instruction.
    pub fn reset(&mut self) {
        self.history.clear();
    }

    /// Answers `question` in the context of the conversation so far.
    ///
    /// A failed turn leaves the conversation as it was before the question.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError`] on provider failures or if the tool loop
    /// exceeds its iteration limit.
    pub async fn ask(
        &mut self,
        provider: &dyn LlmProvider,
        dispatcher: &dyn ToolDispatcher,
        question: &str,
    ) -> Result<AgentResponse, AgentError> {
        let mut messages = std::mem::take(&mut self.history);
        let mark = messages.len();
        messages.push(user_message(question));

        let outcome = execute_with_tools(&*self, provider, &mut messages, dispatcher).await;
        if let Err(e) = &outcome {
            warn!(agent = ASSISTANT_NAME, error = %e, "turn failed; discarding it");
            messages.truncate(mark);
        }
        self.history = messages;
        outcome
    }
}

impl Agent for AnalyticsAssistant {
    fn name(&self) -> &'static str {
        ASSISTANT_NAME
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn system_prompt(&self) -> &str {
        &self.instruction
    }

    fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    fn tools(&self) -> Vec<ToolDefinition> {
        self.tools.definitions().to_vec()
    }

    fn max_tool_iterations(&self) -> usize {
        self.max_tool_iterations
    }
}
