//! Google Gemini `generateContent` client with function calling.

use std::time::Instant;

use async_trait::async_trait;
use menubot_core::{AgentError, AgentMessage, ModelConfig, ToolCall, ToolSchema};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{llm_err, ChatModel, ChatResponse, LlmMetrics, LlmResponse};

const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    system_instruction: Content,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<GeminiTool>,
    generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    thought: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    function_call: Option<FunctionCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    function_response: Option<FunctionResponse>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
struct FunctionCall {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    name: String,
    #[serde(default)]
    args: serde_json::Value,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
struct FunctionResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    name: String,
    response: serde_json::Value,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiTool {
    function_declarations: Vec<FunctionDeclaration>,
}

#[derive(Serialize)]
struct FunctionDeclaration {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

impl Part {
    fn text(text: &str) -> Self {
        Self { text: Some(text.to_string()), ..Default::default() }
    }
}

/// Converts the agent conversation to Gemini contents.
///
/// Consecutive tool results are batched into one `user` turn, matching the
/// single `model` turn that requested them.
fn to_contents(messages: &[AgentMessage]) -> Vec<Content> {
    let mut contents: Vec<Content> = Vec::new();

    for msg in messages {
        match msg {
            AgentMessage::User(text) => contents.push(Content {
                role: Some("user".into()),
                parts: vec![Part::text(text)],
            }),
            AgentMessage::ToolCalls(calls) => contents.push(Content {
                role: Some("model".into()),
                parts: calls
                    .iter()
                    .map(|call| Part {
                        function_call: Some(FunctionCall {
                            id: None,
                            name: call.name.clone(),
                            args: call.arguments.clone(),
                        }),
                        ..Default::default()
                    })
                    .collect(),
            }),
            AgentMessage::ToolResult { name, content, .. } => {
                let part = Part {
                    function_response: Some(FunctionResponse {
                        id: None,
                        name: name.clone(),
                        response: json!({ "content": content }),
                    }),
                    ..Default::default()
                };
                let batch = contents.last().is_some_and(|last| {
                    !last.parts.is_empty() && last.parts.iter().all(|p| p.function_response.is_some())
                });
                match contents.last_mut() {
                    Some(last) if batch => last.parts.push(part),
                    _ => {
                        let content = Content {
                            role: Some("user".into()),
                            parts: vec![part],
                        };
                        contents.push(content);
                    }
                }
            }
        }
    }

    contents
}

/// Client for the native Gemini API.
pub struct GeminiClient {
    client: Client,
    endpoint: String,
    config: ModelConfig,
}

impl GeminiClient {
    /// Creates a client against the public Gemini endpoint.
    pub fn new(config: &ModelConfig) -> Self {
        info!(
            "GeminiClient: model={}, api_key_len={}",
            config.model,
            config.api_key.len()
        );
        Self {
            client: Client::new(),
            endpoint: GEMINI_API_URL.to_string(),
            config: config.clone(),
        }
    }

    /// Overrides the API base URL (used by tests and proxies).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    fn url(&self) -> String {
        let model = self.config.model.trim_start_matches("models/");
        format!("{}/models/{}:generateContent", self.endpoint, model)
    }
}

#[async_trait]
impl ChatModel for GeminiClient {
    async fn chat_with_tools(
        &self,
        system_prompt: &str,
        messages: &[AgentMessage],
        tools: &[ToolSchema],
    ) -> Result<ChatResponse, AgentError> {
        let start = Instant::now();

        let function_declarations: Vec<FunctionDeclaration> = tools
            .iter()
            .map(|t| FunctionDeclaration {
                name: t.name.clone(),
                description: t.description.clone(),
                parameters: t.parameters.clone(),
            })
            .collect();

        let request = GenerateContentRequest {
            contents: to_contents(messages),
            system_instruction: Content {
                role: None,
                parts: vec![Part::text(system_prompt)],
            },
            tools: if function_declarations.is_empty() {
                vec![]
            } else {
                vec![GeminiTool { function_declarations }]
            },
            generation_config: GenerationConfig {
                max_output_tokens: self.config.max_output_tokens,
                temperature: self.config.temperature,
            },
        };

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(llm_err)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("Gemini API error {}: {}", status, body);
            return Err(AgentError::LlmError(format!("Gemini API error {}: {}", status, body)));
        }

        let resp: GenerateContentResponse = response.json().await.map_err(llm_err)?;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        let (input_tokens, output_tokens) = resp
            .usage_metadata
            .map(|u| (u.prompt_token_count, u.candidates_token_count))
            .unwrap_or((0, 0));
        let metrics = LlmMetrics { input_tokens, output_tokens, elapsed_ms };

        info!("Gemini: {}ms, tokens: {}/{} (in/out)", elapsed_ms, input_tokens, output_tokens);

        let parts = resp
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts)
            .unwrap_or_default();

        let calls: Vec<ToolCall> = parts
            .iter()
            .filter_map(|p| p.function_call.as_ref())
            .map(|fc| ToolCall {
                id: fc
                    .id
                    .clone()
                    .unwrap_or_else(|| format!("call_{}", Uuid::new_v4().simple())),
                name: fc.name.clone(),
                arguments: fc.args.clone(),
            })
            .collect();

        if !calls.is_empty() {
            return Ok(ChatResponse::ToolCalls { calls, metrics });
        }

        let content: String = parts
            .into_iter()
            .filter(|p| p.thought != Some(true))
            .filter_map(|p| p.text)
            .collect();

        if content.is_empty() {
            return Err(AgentError::LlmError("No response content".into()));
        }

        Ok(ChatResponse::Content(LlmResponse { content, metrics }))
    }
}
