use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::menu::{Menu, MenuQuery, MENU};
use crate::{Tool, ToolError};

/// Menu lookup tool backed by the static [`MENU`].
pub struct GetMenuTool {
    menu: &'static Menu,
}

impl GetMenuTool {
    pub fn new() -> Self {
        Self { menu: &MENU }
    }
}

impl Default for GetMenuTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for GetMenuTool {
    fn name(&self) -> &str {
        "get_menu"
    }

    fn description(&self) -> &str {
        "Return the final answer for today's menu based on category, subcategory, cuisine, or diet. Filters are optional."
    }

    fn parameters(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "category": {
                    "type": "string",
                    "description": "Type of meal (breakfast, lunch, dinner, snacks)"
                },
                "subcategory": {
                    "type": "string",
                    "description": "Optional: e.g., main, desserts, beverages, starters"
                },
                "cuisine": {
                    "type": "string",
                    "description": "Optional: e.g., Indian, Italian, Chinese"
                },
                "diet": {
                    "type": "string",
                    "description": "Optional: vegan, vegetarian, gluten-free"
                }
            },
            "required": ["category"]
        })
    }

    async fn execute(&self, args: serde_json::Value) -> Result<String, ToolError> {
        let query: MenuQuery = serde_json::from_value(args)
            .map_err(|e| ToolError::InvalidArguments(e.to_string()))?;

        debug!("get_menu query: {:?}", query);
        Ok(self.menu.lookup(&query))
    }
}
