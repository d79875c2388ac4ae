use crate::traits::{Tool, ToolResult, ToolSpec};
use tracing::warn;

/// Tools available to the agent loop, all operating on the same context type.
///
/// Filled once at startup and only read while turns are served.
pub struct ToolRegistry<C: Send> {
    tools: Vec<Box<dyn Tool<C>>>,
}

impl<C: Send> Default for ToolRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Send> ToolRegistry<C> {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    pub fn register(&mut self, tool: impl Tool<C> + 'static) {
        self.tools.push(Box::new(tool));
    }

    pub fn with_tool(mut self, tool: impl Tool<C> + 'static) -> Self {
        self.register(tool);
        self
    }

    pub fn get_specs(&self) -> Vec<ToolSpec> {
        self.tools.iter().map(|t| t.spec()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub async fn execute(&self, name: &str, ctx: &mut C, args: serde_json::Value) -> ToolResult {
        let Some(tool) = self.tools.iter().find(|t| t.name() == name) else {
            warn!(tool = name, "model requested unknown tool");
            return ToolResult::error(format!("Tool '{}' not found", name));
        };

        match tool.execute(ctx, args).await {
            Ok(result) => result,
            Err(e) => ToolResult::error(format!("Execution failed: {}", e)),
        }
    }
}
