//! Core domain types and error definitions for menubot.
//!
//! This crate provides the fundamental types shared across the workspace:
//!
//! - [`AgentError`]: Error type for agent and LLM operations
//! - [`AgentMessage`]: One entry of the agent's prompt scratchpad
//! - [`ModelConfig`]: LLM model configuration
//! - [`ToolCall`], [`ToolSchema`]: Tool interaction types
//!
//! # Example
//!
//! ```rust
//! use menubot_core::{AgentMessage, ModelConfig};
//!
//! let model = ModelConfig::new("models/gemini-2.5-flash", "secret");
//! assert_eq!(model.max_output_tokens, 2048);
//!
//! let msg = AgentMessage::user("What's for dinner?");
//! assert!(matches!(msg, AgentMessage::User(_)));
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while running the agent or talking to an LLM.
#[derive(Error, Debug)]
pub enum AgentError {
    /// LLM API request failed.
    #[error("LLM request failed: {0}")]
    LlmError(String),

    /// Failed to parse a provider response or tool arguments.
    #[error("Failed to parse structured output: {0}")]
    ParseError(String),

    /// A tool returned an error instead of an observation.
    #[error("Tool '{tool}' failed: {message}")]
    ToolFailed { tool: String, message: String },

    /// The LLM asked for a tool that is not registered.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
}

impl From<serde_json::Error> for AgentError {
    fn from(err: serde_json::Error) -> Self {
        AgentError::ParseError(err.to_string())
    }
}

/// Configuration for the LLM behind the agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// The model identifier (e.g., "models/gemini-2.5-flash").
    pub model: String,
    /// Optional OpenAI-compatible API base. When unset the native Gemini API is used.
    pub api_base: Option<String>,
    /// API key sent to the provider.
    #[serde(skip_serializing)]
    pub api_key: String,
    /// Upper bound on generated tokens per call.
    pub max_output_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
}

impl ModelConfig {
    /// Default cap on output tokens.
    pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 2048;
    /// Default sampling temperature.
    pub const DEFAULT_TEMPERATURE: f32 = 0.7;

    /// Creates a config with default generation parameters.
    pub fn new(model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            api_base: None,
            api_key: api_key.into(),
            max_output_tokens: Self::DEFAULT_MAX_OUTPUT_TOKENS,
            temperature: Self::DEFAULT_TEMPERATURE,
        }
    }
}

// ============================================================================
// Tool Types
// ============================================================================

/// A tool call requested by the LLM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Identifier used to pair the call with its result.
    pub id: String,
    /// Name of the tool to execute.
    pub name: String,
    /// Arguments to pass to the tool (JSON object).
    pub arguments: serde_json::Value,
}

/// JSON schema describing a tool for LLM function calling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Unique name of the tool (e.g., "get_menu").
    pub name: String,
    /// Human-readable description of what the tool does.
    pub description: String,
    /// JSON Schema object describing the tool's parameters.
    pub parameters: serde_json::Value,
}

/// A single entry in the agent conversation sent to the LLM.
///
/// The first entry is the user's input; tool calls and their results are
/// appended as the agent scratchpad.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentMessage {
    /// Human input.
    User(String),
    /// Tool calls the model asked for in one turn.
    ToolCalls(Vec<ToolCall>),
    /// The observation produced by running a tool call.
    ToolResult {
        call_id: String,
        name: String,
        content: String,
    },
}

impl AgentMessage {
    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::User(content.into())
    }

    /// Creates a tool result message for the given call.
    pub fn tool_result(call: &ToolCall, content: impl Into<String>) -> Self {
        Self::ToolResult {
            call_id: call.id.clone(),
            name: call.name.clone(),
            content: content.into(),
        }
    }
}
