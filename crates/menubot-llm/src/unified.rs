//! Unified LLM client that routes to the appropriate provider based on config.

use async_trait::async_trait;
use menubot_core::{AgentError, AgentMessage, ModelConfig, ToolSchema};

use crate::client::LlmClient;
use crate::gemini::GeminiClient;
use crate::{ChatModel, ChatResponse};

/// Provider backend determined from the model configuration.
enum Backend {
    Gemini(GeminiClient),
    OpenAiCompatible(LlmClient),
}

/// Client that routes requests to Gemini or an OpenAI-compatible endpoint.
///
/// A configured `api_base` selects the OpenAI-compatible client; otherwise
/// the native Gemini API is used.
pub struct UnifiedLlmClient {
    model: String,
    backend: Backend,
}

impl UnifiedLlmClient {
    pub fn new(config: &ModelConfig) -> Self {
        let backend = match config.api_base {
            Some(_) => Backend::OpenAiCompatible(LlmClient::new(config)),
            None => Backend::Gemini(GeminiClient::new(config)),
        };

        Self {
            model: config.model.clone(),
            backend,
        }
    }

    /// Returns true if this client talks to the native Gemini API.
    pub fn is_gemini(&self) -> bool {
        matches!(self.backend, Backend::Gemini(_))
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ChatModel for UnifiedLlmClient {
    async fn chat_with_tools(
        &self,
        system_prompt: &str,
        messages: &[AgentMessage],
        tools: &[ToolSchema],
    ) -> Result<ChatResponse, AgentError> {
        match &self.backend {
            Backend::Gemini(client) => client.chat_with_tools(system_prompt, messages, tools).await,
            Backend::OpenAiCompatible(client) => {
                client.chat_with_tools(system_prompt, messages, tools).await
            }
        }
    }
}
