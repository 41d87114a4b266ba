//! Tool registry, the static menu, and the menu lookup tool.
//!
//! - [`Tool`]: Trait for tools the agent can call
//! - [`ToolRegistry`]: Registry of available tools
//! - [`Menu`] / [`MenuNode`]: The restaurant's immutable menu
//! - [`MenuQuery`]: Filters accepted by the lookup
//! - [`GetMenuTool`]: Exposes [`Menu::lookup`] to the LLM
//!
//! # Looking up the menu directly
//!
//! ```rust
//! use menubot_tools::{MenuQuery, MENU};
//!
//! let answer = MENU.lookup(&MenuQuery::new("breakfast").diet("vegan"));
//! assert_eq!(answer, "Here are the items for breakfast [vegan]:\n- Poha\n- Fruit Salad");
//! ```
//!
//! # Using the Registry
//!
//! ```rust,ignore
//! use menubot_tools::ToolRegistry;
//!
//! let registry = ToolRegistry::with_defaults();
//! let schemas = registry.list();
//! let tool = registry.get("get_menu").unwrap();
//! let output = tool.execute(serde_json::json!({ "category": "snacks" })).await?;
//! ```

mod get_menu;
mod menu;

pub use get_menu::GetMenuTool;
pub use menu::{Menu, MenuNode, MenuQuery, MENU};

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

pub use menubot_core::{ToolCall, ToolSchema};

/// Errors that can occur during tool execution.
#[derive(Error, Debug)]
pub enum ToolError {
    /// Invalid arguments were passed to the tool.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Requested tool was not found in the registry.
    #[error("Tool not found: {0}")]
    NotFound(String),
}

/// Trait for implementing tools that can be called by LLMs.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Returns the unique name of this tool.
    fn name(&self) -> &str;

    /// Returns a description of what this tool does.
    fn description(&self) -> &str;

    /// Returns the JSON Schema for this tool's parameters.
    fn parameters(&self) -> serde_json::Value;

    /// Executes the tool with the given JSON arguments and returns its observation.
    async fn execute(&self, args: serde_json::Value) -> Result<String, ToolError>;

    /// Generates the schema for this tool (default implementation).
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters(),
        }
    }
}

/// Registry of tools available to the agent.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    /// Creates an empty tool registry.
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Creates a registry holding the menu lookup tool.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(GetMenuTool::new());
        registry
    }

    /// Registers a tool in the registry.
    ///
    /// If a tool with the same name already exists, it will be replaced.
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        self.tools.insert(tool.name().to_string(), Arc::new(tool));
    }

    /// Gets a tool by name, or [`ToolError::NotFound`].
    pub fn require(&self, name: &str) -> Result<Arc<dyn Tool>, ToolError> {
        self.tools.get(name).cloned().ok_or_else(|| ToolError::NotFound(name.to_string()))
    }

    /// Returns schemas for all registered tools, sorted by name.
    pub fn list(&self) -> Vec<ToolSchema> {
        let mut schemas: Vec<ToolSchema> = self.tools.values().map(|t| t.schema()).collect();
        schemas.sort_by(|a, b| a.name.cmp(&b.name));
        schemas
    }
}
