use crate::todo::{Action, TodoStore};
use crate::tools::{extract_string_arg_opt, extract_text_arg};
use crate::traits::{Tool, ToolResult};
use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

pub const INVALID_INDEX: &str = "❗ Invalid index.";

/// Adds, removes and lists items in the session's [`TodoStore`].
#[derive(Debug, Default)]
pub struct TodoManagerTool;

impl TodoManagerTool {
    pub fn new() -> Self {
        Self
    }

    /// Applies one invocation to `store` and describes the outcome.
    ///
    /// Never fails: a bad position becomes [`INVALID_INDEX`] and anything
    /// unrecognised lists the current tasks.
    pub fn run(store: &mut TodoStore, action: &str, item: Option<&str>) -> String {
        let action = Action::parse(action, item);
        let reply = match action {
            Action::Add(item) => store.add(item),
            Action::Remove(position) => store.remove(position).unwrap_or_else(|e| {
                debug!(error = %e, "todo removal rejected");
                INVALID_INDEX.to_string()
            }),
            Action::List => store.list(),
        };
        debug!(?action, len = store.len(), "todo tool invoked");
        reply
    }
}

#[async_trait]
impl Tool<TodoStore> for TodoManagerTool {
    fn name(&self) -> &str {
        "todo_manager_tool"
    }

    fn description(&self) -> &str {
        "Manage the user's to-do list. action='add' appends `item`; action='remove' deletes the task at the 1-based position given in `item`; action='list' returns the numbered tasks."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "action": {
                    "type": "string",
                    "enum": ["add", "remove", "list"],
                    "description": "Operation to perform"
                },
                "item": {
                    "type": ["string", "null"],
                    "description": "Task text for 'add', 1-based position for 'remove', omitted for 'list'"
                }
            },
            "required": ["action"]
        })
    }

    async fn execute(
        &self,
        store: &mut TodoStore,
        args: serde_json::Value,
    ) -> anyhow::Result<ToolResult> {
        let action = extract_string_arg_opt(&args, "action", "list");
        let item = extract_text_arg(&args, "item");

        Ok(ToolResult::success(Self::run(
            store,
            &action,
            item.as_deref(),
        )))
    }
}
