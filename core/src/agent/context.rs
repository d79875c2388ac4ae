use crate::traits::{ChatMessage, ToolSpec};
use std::fmt::Write;

pub const DEFAULT_INSTRUCTIONS: &str = r#"## Identity

You are "Hermes", a strategic and efficient task manager. You help the user add, remove, list, prioritize and review the tasks in their to-do list using a dedicated tool.

## Objectives

- Always use `todo_manager_tool` to change or read the list.
- Confirm every update with a clear message.
- If the request is vague, ask a single clarifying question.

## Tone & Style

- Friendly, concise language.
- Use bullet points or numbered lists when showing tasks.
- Begin confirmations with "✅" for successes and "❗" for issues.

## Tool Usage

- Add: `{"action": "add", "item": "<task>"}`
- Remove: `{"action": "remove", "item": "<position>"}` where position is the 1-based number shown in the list
- List: `{"action": "list"}`

## Constraints

- Never claim a change you did not make through the tool.
- Positions shift after a removal; list again before removing by number if unsure."#;

pub struct ContextBuilder {
    pub instructions: String,
    pub tool_specs: Vec<ToolSpec>,
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextBuilder {
    pub fn new() -> Self {
        Self {
            instructions: DEFAULT_INSTRUCTIONS.to_string(),
            tool_specs: vec![],
        }
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    pub fn with_tool_specs(mut self, tool_specs: Vec<ToolSpec>) -> Self {
        self.tool_specs = tool_specs;
        self
    }

    pub fn build_system_prompt(&self) -> String {
        let mut parts = vec![];

        if !self.instructions.trim().is_empty() {
            parts.push(self.instructions.trim().to_string());
        }

        if let Some(tools) = self.get_tool_instructions() {
            parts.push(tools);
        }

        parts.push(self.get_runtime_context());

        parts.join("\n\n---\n\n")
    }

    fn get_tool_instructions(&self) -> Option<String> {
        if self.tool_specs.is_empty() {
            return None;
        }

        let mut instructions = String::new();
        instructions.push_str("## Tool Use Protocol\n\n");
        instructions.push_str(
            "Prefer native function calls. If they are unavailable, wrap a JSON object in <tool_call> tags:\n\n",
        );
        instructions.push_str("```\n<tool_call>\n{\"name\": \"tool_name\", \"arguments\": {\"param\": \"value\"}}\n</tool_call>\n```\n\n");
        instructions.push_str("Tool results come back in the next message. ");
        instructions.push_str("Keep going until you can give the user a final answer.\n\n");
        instructions.push_str("### Available Tools\n\n");

        for tool in &self.tool_specs {
            let _ = writeln!(
                instructions,
                "**{}**: {}\nParameters: `{}`\n",
                tool.name, tool.description, tool.parameters_schema
            );
        }

        Some(instructions)
    }

    fn get_runtime_context(&self) -> String {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M (%A)");

        format!("## Runtime Context\n\n### Current Time\n{}", timestamp)
    }

    pub fn build_messages(
        &self,
        history: &[ChatMessage],
        current_message: &str,
    ) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::system(self.build_system_prompt()));
        messages.extend_from_slice(history);
        messages.push(ChatMessage::user(current_message));
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Role;
    use serde_json::json;

    #[test]
    fn prompt_lists_tools() {
        let builder = ContextBuilder::new().with_tool_specs(vec![ToolSpec {
            name: "todo_manager_tool".into(),
            description: "manage todos".into(),
            parameters_schema: json!({"type": "object"}),
        }]);

        let prompt = builder.build_system_prompt();
        assert!(prompt.contains("Hermes"));
        assert!(prompt.contains("**todo_manager_tool**: manage todos"));
        assert!(prompt.contains("## Runtime Context"));
    }

    #[test]
    fn prompt_without_tools_skips_protocol() {
        let prompt = ContextBuilder::new()
            .with_instructions("Be brief.")
            .build_system_prompt();
        assert!(prompt.starts_with("Be brief."));
        assert!(!prompt.contains("Tool Use Protocol"));
    }

    #[test]
    fn messages_wrap_history() {
        let history = vec![ChatMessage::user("hi"), ChatMessage::assistant("hello")];
        let messages = ContextBuilder::new().build_messages(&history, "list my tasks");

        let roles: Vec<_> = messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            [Role::System, Role::User, Role::Assistant, Role::User]
        );
        assert_eq!(messages.last().unwrap().content, "list my tasks");
    }
}
