//! Tool-calling agent executor for menubot.
//!
//! - [`Agent`]: The seam the HTTP layer calls: `invoke(input) -> AgentResult`
//! - [`AgentExecutor`]: Runs the prompt through a [`ChatModel`] with tools
//! - [`AgentResult`] / [`AgentStep`]: Final answer plus tool observations
//!
//! # Execution Model
//!
//! Each invocation is single-turn: the prompt is the system instruction, the
//! user input, and a scratchpad of this invocation's tool calls and results.
//!
//! 1. Send the prompt + tool schemas to the LLM
//! 2. If the LLM answers, return the answer
//! 3. If it asks for tools, run them and record each observation as a step
//! 4. Repeat until the iteration budget (default 1) is spent
//!
//! When the budget runs out on tool calls, `output` is `None` and the caller
//! decides what to do with the recorded observations.
//!
//! ```rust,ignore
//! use menubot_engine::{Agent, AgentExecutor};
//!
//! let agent = AgentExecutor::new(Arc::new(client), Arc::new(ToolRegistry::with_defaults()));
//! let result = agent.invoke("What's vegan for breakfast?").await?;
//! let reply = result.output.as_deref().or(result.first_observation());
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use menubot_core::{AgentError, AgentMessage};
use menubot_llm::{ChatModel, ChatResponse};
use menubot_tools::ToolRegistry;
use serde::Serialize;
use tracing::{debug, info, warn};

/// System instruction used for every invocation.
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant that uses tools when needed";

/// Default tool-calling iteration budget.
pub const DEFAULT_MAX_ITERATIONS: usize = 1;

/// One tool call made during an invocation and what it returned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentStep {
    pub tool: String,
    pub arguments: serde_json::Value,
    pub observation: String,
}

/// Outcome of a single agent invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AgentResult {
    /// The model's final answer, if it produced one within the budget.
    pub output: Option<String>,
    /// Tool calls in the order they ran.
    pub intermediate_steps: Vec<AgentStep>,
}

impl AgentResult {
    /// Creates a result holding a final answer.
    pub fn answered(output: impl Into<String>) -> Self {
        Self {
            output: Some(output.into()),
            intermediate_steps: Vec::new(),
        }
    }

    /// Observation of the first tool call, if any ran.
    pub fn first_observation(&self) -> Option<&str> {
        self.intermediate_steps.first().map(|s| s.observation.as_str())
    }
}

/// Something that can answer a user input.
#[async_trait]
pub trait Agent: Send + Sync {
    async fn invoke(&self, input: &str) -> Result<AgentResult, AgentError>;
}

/// Runs a chat model with the tools from a registry.
pub struct AgentExecutor {
    model: Arc<dyn ChatModel>,
    tools: Arc<ToolRegistry>,
    max_iterations: usize,
}

impl AgentExecutor {
    pub fn new(model: Arc<dyn ChatModel>, tools: Arc<ToolRegistry>) -> Self {
        Self {
            model,
            tools,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    /// Sets the iteration budget (values below 1 are raised to 1).
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }
}

#[async_trait]
impl Agent for AgentExecutor {
    async fn invoke(&self, input: &str) -> Result<AgentResult, AgentError> {
        let schemas = self.tools.list();
        let mut messages = vec![AgentMessage::user(input)];
        let mut steps: Vec<AgentStep> = Vec::new();

        for iteration in 1..=self.max_iterations {
            debug!("Agent iteration {}/{}", iteration, self.max_iterations);

            let response = self
                .model
                .chat_with_tools(SYSTEM_PROMPT, &messages, &schemas)
                .await?;

            let calls = match response {
                ChatResponse::Content(llm_response) => {
                    info!(
                        "Agent answered: {} chars (after {} iterations)",
                        llm_response.content.len(),
                        iteration
                    );
                    return Ok(AgentResult {
                        output: Some(llm_response.content),
                        intermediate_steps: steps,
                    });
                }
                ChatResponse::ToolCalls { calls, metrics: _ } => calls,
            };

            info!("Tool calls: {:?}", calls.iter().map(|c| &c.name).collect::<Vec<_>>());

            let mut results = Vec::with_capacity(calls.len());
            for call in &calls {
                let tool = self
                    .tools
                    .require(&call.name)
                    .map_err(|_| AgentError::UnknownTool(call.name.clone()))?;

                info!("  → Executing tool: {} {}", call.name, call.arguments);
                let observation = tool.execute(call.arguments.clone()).await.map_err(|e| {
                    AgentError::ToolFailed {
                        tool: call.name.clone(),
                        message: e.to_string(),
                    }
                })?;
                info!("  ← Tool result: {} chars", observation.len());

                results.push(AgentMessage::tool_result(call, observation.as_str()));
                steps.push(AgentStep {
                    tool: call.name.clone(),
                    arguments: call.arguments.clone(),
                    observation,
                });
            }

            messages.push(AgentMessage::ToolCalls(calls));
            messages.extend(results);
        }

        warn!(
            "Agent stopped after {} iteration(s) without a final answer ({} tool steps)",
            self.max_iterations,
            steps.len()
        );

        Ok(AgentResult {
            output: None,
            intermediate_steps: steps,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use menubot_core::{ToolCall, ToolSchema};
    use menubot_llm::{LlmMetrics, LlmResponse};
    use serde_json::json;

    /// Replays canned responses and records the conversation it was sent.
    struct ScriptedModel {
        responses: Mutex<VecDeque<Result<ChatResponse, AgentError>>>,
        seen: Mutex<Vec<Vec<AgentMessage>>>,
    }

    impl ScriptedModel {
        fn new(responses: Vec<Result<ChatResponse, AgentError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ChatModel for ScriptedModel {
        async fn chat_with_tools(
            &self,
            system_prompt: &str,
            messages: &[AgentMessage],
            tools: &[ToolSchema],
        ) -> Result<ChatResponse, AgentError> {
            assert_eq!(system_prompt, SYSTEM_PROMPT);
            assert!(tools.iter().any(|t| t.name == "get_menu"));
            self.seen.lock().unwrap().push(messages.to_vec());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("no scripted response left")
        }
    }

    fn answer(text: &str) -> Result<ChatResponse, AgentError> {
        Ok(ChatResponse::Content(LlmResponse {
            content: text.to_string(),
            metrics: LlmMetrics::default(),
        }))
    }

    fn call(name: &str, arguments: serde_json::Value) -> Result<ChatResponse, AgentError> {
        Ok(ChatResponse::ToolCalls {
            calls: vec![ToolCall {
                id: "call_1".into(),
                name: name.into(),
                arguments,
            }],
            metrics: LlmMetrics::default(),
        })
    }

    fn executor(model: Arc<ScriptedModel>) -> AgentExecutor {
        AgentExecutor::new(model, Arc::new(ToolRegistry::with_defaults()))
    }

    #[tokio::test]
    async fn direct_answer_is_returned() {
        let model = ScriptedModel::new(vec![answer("We serve breakfast from 8am.")]);
        let result = executor(model).invoke("breakfast hours?").await.unwrap();
        assert_eq!(result, AgentResult::answered("We serve breakfast from 8am."));
    }

    #[tokio::test]
    async fn single_iteration_budget_returns_the_observation() {
        let model = ScriptedModel::new(vec![call("get_menu", json!({ "category": "breakfast", "diet": "vegan" }))]);
        let result = executor(model.clone()).invoke("vegan breakfast?").await.unwrap();

        assert_eq!(result.output, None);
        assert_eq!(result.intermediate_steps.len(), 1);
        assert_eq!(result.intermediate_steps[0].tool, "get_menu");
        assert_eq!(
            result.first_observation(),
            Some("Here are the items for breakfast [vegan]:\n- Poha\n- Fruit Salad")
        );
        assert_eq!(model.seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn larger_budget_feeds_observations_back() {
        let model = ScriptedModel::new(vec![
            call("get_menu", json!({ "category": "snacks" })),
            answer("Try the samosa!"),
        ]);
        let result = executor(model.clone())
            .with_max_iterations(2)
            .invoke("snack menu?")
            .await
            .unwrap();

        assert_eq!(result.output.as_deref(), Some("Try the samosa!"));
        assert_eq!(result.intermediate_steps.len(), 1);

        let seen = model.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1].len(), 3);
        assert!(matches!(seen[1][1], AgentMessage::ToolCalls(_)));
        match &seen[1][2] {
            AgentMessage::ToolResult { call_id, content, .. } => {
                assert_eq!(call_id, "call_1");
                assert!(content.starts_with("Here are all snacks items:"));
            }
            other => panic!("expected tool result, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn unknown_tool_is_an_error() {
        let model = ScriptedModel::new(vec![call("web_search", json!({ "query": "menu" }))]);
        let err = executor(model).invoke("menu?").await.unwrap_err();
        assert!(matches!(err, AgentError::UnknownTool(name) if name == "web_search"));
    }

    #[tokio::test]
    async fn invalid_tool_arguments_are_an_error() {
        let model = ScriptedModel::new(vec![call("get_menu", json!({ "diet": "vegan" }))]);
        let err = executor(model).invoke("vegan food?").await.unwrap_err();
        assert!(matches!(err, AgentError::ToolFailed { ref tool, .. } if tool == "get_menu"));
    }

    #[tokio::test]
    async fn provider_errors_propagate() {
        let model = ScriptedModel::new(vec![Err(AgentError::LlmError("quota exceeded".into()))]);
        let err = executor(model).invoke("menu?").await.unwrap_err();
        assert!(matches!(err, AgentError::LlmError(_)));
    }

    #[test]
    fn zero_budget_is_raised_to_one() {
        let model = ScriptedModel::new(vec![]);
        assert_eq!(executor(model).with_max_iterations(0).max_iterations, 1);
    }
}
