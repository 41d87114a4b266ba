//! OpenAI-compatible chat client with tool calling.
//!
//! Works with the OpenAI API and any compatible endpoint, including Gemini's
//! `/v1beta/openai` endpoint and Ollama's `/v1`.

use std::time::Instant;

use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestToolMessageArgs, ChatCompletionRequestUserMessageArgs,
        ChatCompletionTool, ChatCompletionToolType, CreateChatCompletionRequestArgs, FunctionCall,
        FunctionObject,
    },
    Client,
};
use async_trait::async_trait;
use menubot_core::{AgentError, AgentMessage, ModelConfig, ToolCall, ToolSchema};
use tracing::{debug, info};

use crate::{llm_err, ChatModel, ChatResponse, LlmMetrics, LlmResponse};

/// Client for OpenAI-compatible chat completion APIs.
pub struct LlmClient {
    client: Client<OpenAIConfig>,
    config: ModelConfig,
}

impl LlmClient {
    /// Creates a client; `config.api_base` overrides the OpenAI default base URL.
    pub fn new(config: &ModelConfig) -> Self {
        let mut openai = OpenAIConfig::new().with_api_key(config.api_key.clone());
        if let Some(base) = &config.api_base {
            openai = openai.with_api_base(base.clone());
        }

        Self {
            client: Client::with_config(openai),
            config: config.clone(),
        }
    }

    /// Builds the request message list: system prompt, then the agent conversation.
    fn build_messages(
        system_prompt: &str,
        messages: &[AgentMessage],
    ) -> Result<Vec<ChatCompletionRequestMessage>, AgentError> {
        let mut all_messages = vec![ChatCompletionRequestMessage::System(
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system_prompt)
                .build()
                .map_err(llm_err)?,
        )];

        for msg in messages {
            let converted = match msg {
                AgentMessage::User(content) => ChatCompletionRequestMessage::User(
                    ChatCompletionRequestUserMessageArgs::default()
                        .content(content.as_str())
                        .build()
                        .map_err(llm_err)?,
                ),
                AgentMessage::ToolCalls(calls) => ChatCompletionRequestMessage::Assistant(
                    ChatCompletionRequestAssistantMessageArgs::default()
                        .tool_calls(
                            calls
                                .iter()
                                .map(|call| ChatCompletionMessageToolCall {
                                    id: call.id.clone(),
                                    r#type: ChatCompletionToolType::Function,
                                    function: FunctionCall {
                                        name: call.name.clone(),
                                        arguments: call.arguments.to_string(),
                                    },
                                })
                                .collect::<Vec<_>>(),
                        )
                        .build()
                        .map_err(llm_err)?,
                ),
                AgentMessage::ToolResult { call_id, content, .. } => ChatCompletionRequestMessage::Tool(
                    ChatCompletionRequestToolMessageArgs::default()
                        .tool_call_id(call_id.as_str())
                        .content(content.as_str())
                        .build()
                        .map_err(llm_err)?,
                ),
            };
            all_messages.push(converted);
        }

        Ok(all_messages)
    }

    /// Converts provider tool calls, parsing each argument string as JSON.
    ///
    /// Blank arguments become an empty object.
    fn parse_tool_calls(
        tool_calls: Vec<ChatCompletionMessageToolCall>,
    ) -> Result<Vec<ToolCall>, AgentError> {
        tool_calls
            .into_iter()
            .map(|tc| -> Result<ToolCall, AgentError> {
                let raw = tc.function.arguments.trim();
                let arguments = if raw.is_empty() {
                    serde_json::json!({})
                } else {
                    serde_json::from_str(raw)?
                };
                Ok(ToolCall {
                    id: tc.id,
                    name: tc.function.name,
                    arguments,
                })
            })
            .collect()
    }
}

#[async_trait]
impl ChatModel for LlmClient {
    async fn chat_with_tools(
        &self,
        system_prompt: &str,
        messages: &[AgentMessage],
        tools: &[ToolSchema],
    ) -> Result<ChatResponse, AgentError> {
        let start = Instant::now();

        let openai_tools: Vec<ChatCompletionTool> = tools
            .iter()
            .map(|t| ChatCompletionTool {
                r#type: ChatCompletionToolType::Function,
                function: FunctionObject {
                    name: t.name.clone(),
                    description: Some(t.description.clone()),
                    parameters: Some(t.parameters.clone()),
                    strict: None,
                },
            })
            .collect();

        let mut request_builder = CreateChatCompletionRequestArgs::default();
        request_builder
            .model(&self.config.model)
            .messages(Self::build_messages(system_prompt, messages)?)
            .max_completion_tokens(self.config.max_output_tokens)
            .temperature(self.config.temperature);

        if !openai_tools.is_empty() {
            request_builder.tools(openai_tools);
        }

        let request = request_builder.build().map_err(llm_err)?;
        let response = self.client.chat().create(request).await.map_err(llm_err)?;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        let (input_tokens, output_tokens) = response
            .usage
            .as_ref()
            .map(|u| (u.prompt_tokens, u.completion_tokens))
            .unwrap_or((0, 0));

        let metrics = LlmMetrics { input_tokens, output_tokens, elapsed_ms };
        info!("LLM: {}ms, tokens: {}/{} (in/out)", elapsed_ms, input_tokens, output_tokens);

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AgentError::LlmError("No response choices".into()))?;

        if let Some(tool_calls) = choice.message.tool_calls.filter(|calls| !calls.is_empty()) {
            let calls = Self::parse_tool_calls(tool_calls)?;
            return Ok(ChatResponse::ToolCalls { calls, metrics });
        }

        let content = choice
            .message
            .content
            .ok_or_else(|| AgentError::LlmError("No response content".into()))?;

        debug!("LLM content: {} chars", content.len());
        Ok(ChatResponse::Content(LlmResponse { content, metrics }))
    }
}
