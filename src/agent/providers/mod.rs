//! Concrete [`LlmProvider`](super::provider::LlmProvider) implementations.

pub mod openai;

pub use openai::{GEMINI_OPENAI_BASE, OpenAiProvider};
