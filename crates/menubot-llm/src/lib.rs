//! LLM clients with tool calling for the menubot agent.
//!
//! - [`ChatModel`]: The seam the agent executor talks to
//! - [`UnifiedLlmClient`]: Recommended: picks the provider from the config
//! - [`GeminiClient`]: Native Google Gemini `generateContent` API
//! - [`LlmClient`]: OpenAI-compatible client (Gemini's OpenAI endpoint, Ollama, OpenAI)
//!
//! # Tool Calling
//!
//! ```rust,ignore
//! use menubot_core::{AgentMessage, ModelConfig, ToolSchema};
//! use menubot_llm::{ChatModel, ChatResponse, UnifiedLlmClient};
//!
//! let client = UnifiedLlmClient::new(&ModelConfig::new("models/gemini-2.5-flash", api_key));
//! let messages = vec![AgentMessage::user("What's for lunch?")];
//!
//! match client.chat_with_tools(system, &messages, &tools).await? {
//!     ChatResponse::Content(resp) => println!("{}", resp.content),
//!     ChatResponse::ToolCalls { calls, .. } => {
//!         for call in calls {
//!             println!("Call {}: {}({})", call.id, call.name, call.arguments);
//!         }
//!     }
//! }
//! ```

mod client;
mod gemini;
mod unified;

use async_trait::async_trait;
use menubot_core::{AgentError, AgentMessage};

pub use client::LlmClient;
pub use gemini::GeminiClient;
pub use menubot_core::{ToolCall, ToolSchema};
pub use unified::UnifiedLlmClient;

/// Token usage and timing metrics from an LLM call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LlmMetrics {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub elapsed_ms: u64,
}

/// Complete text response from an LLM call.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub content: String,
    pub metrics: LlmMetrics,
}

/// Response from an LLM that may include tool calls.
#[derive(Debug, Clone)]
pub enum ChatResponse {
    Content(LlmResponse),
    ToolCalls { calls: Vec<ToolCall>, metrics: LlmMetrics },
}

/// A chat model that can answer directly or ask for tool calls.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Sends the system prompt, the conversation so far and the available
    /// tools; returns either final content or the tool calls to run.
    async fn chat_with_tools(
        &self,
        system_prompt: &str,
        messages: &[AgentMessage],
        tools: &[ToolSchema],
    ) -> Result<ChatResponse, AgentError>;
}

/// Converts any error into an AgentError::LlmError.
pub(crate) fn llm_err(e: impl ToString) -> AgentError {
    AgentError::LlmError(e.to_string())
}
