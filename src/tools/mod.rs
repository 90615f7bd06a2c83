//! Tool provider: the named operations the planner can invoke.
//!
//! Each tool declares a JSON schema for its parameters; the schemas are
//! rendered into the system prompt so the model knows the call signatures.
//! Dispatch is by name with JSON arguments.

pub mod canvas;
pub mod checksum;
pub mod email;

pub use checksum::ascii_exponential_sum;

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::canvas::Canvas;
use crate::config::Config;

/// Shared state handed to every tool invocation.
///
/// Holds the single open canvas; tools that draw lock it for the duration of
/// their input synthesis.
pub struct ToolContext {
    pub config: Config,
    pub canvas: Mutex<Option<Canvas>>,
}

impl ToolContext {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            canvas: Mutex::new(None),
        }
    }
}

/// A named operation with a declared parameter schema.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn parameters_schema(&self) -> Value;

    async fn execute(&self, args: Value, ctx: &ToolContext) -> anyhow::Result<String>;
}

/// Summary of a registered tool, used to build the system prompt.
pub struct ToolInfo {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Registry of available tools, dispatched by name.
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a registry with the full tool set.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(canvas::OpenCanvas));
        registry.register(Box::new(canvas::DrawRectangle));
        registry.register(Box::new(canvas::AddText));
        registry.register(Box::new(canvas::SaveImage));
        registry.register(Box::new(email::SendEmail));
        registry.register(Box::new(checksum::AsciiExponentialSum));
        registry
    }

    /// Create a registry with no tools (useful for testing).
    pub fn empty() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool under its declared name.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// List registered tools, sorted by name.
    pub fn list_tools(&self) -> Vec<ToolInfo> {
        let mut infos: Vec<ToolInfo> = self
            .tools
            .values()
            .map(|t| ToolInfo {
                name: t.name().to_string(),
                description: t.description().to_string(),
                parameters: t.parameters_schema(),
            })
            .collect();
        infos.sort_by(|a, b| a.name.cmp(&b.name));
        infos
    }

    /// Execute a tool by name.
    pub async fn execute(
        &self,
        name: &str,
        args: Value,
        ctx: &ToolContext,
    ) -> anyhow::Result<String> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| anyhow::anyhow!("Tool '{}' not found", name))?;

        tool.execute(args, ctx).await
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn test_context() -> ToolContext {
        ToolContext::new(Config::new(
            "test-key".to_string(),
            "test-model".to_string(),
            PathBuf::from("."),
        ))
    }

    #[tokio::test]
    async fn unknown_tool_fails_dispatch() {
        let registry = ToolRegistry::new();
        let ctx = test_context();

        let err = registry
            .execute("launch_missiles", serde_json::json!({}), &ctx)
            .await
            .expect_err("unknown tool should fail");
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn full_registry_lists_all_tools_sorted() {
        let registry = ToolRegistry::new();
        let names: Vec<String> = registry.list_tools().into_iter().map(|t| t.name).collect();
        assert_eq!(
            names,
            vec![
                "add_text",
                "ascii_exponential_sum",
                "draw_rectangle",
                "open_canvas",
                "save_image",
                "send_email",
            ]
        );
    }
}
