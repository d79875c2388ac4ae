use crate::agent::{ContextBuilder, ToolRegistry};
use crate::traits::{ChatMessage, ChatRequest, Provider, ToolCall, ToolResult};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info, warn};

const DEFAULT_MAX_ITERATIONS: usize = 20;

const TOOL_CALL_OPEN_TAG: &str = "<tool_call>";
const TOOL_CALL_CLOSE_TAG: &str = "</tool_call>";

pub const MAX_ITERATIONS_REPLY: &str = "Max iterations reached";
pub const NO_RESPONSE_REPLY: &str = "No response from provider";

/// Drives one conversational turn: asks the provider for a reply, runs any
/// tool calls it requests against the session context `C`, and repeats until
/// the model answers in plain text.
pub struct AgentLoop<C: Send> {
    provider: Arc<dyn Provider>,
    context_builder: ContextBuilder,
    tool_registry: ToolRegistry<C>,
    max_iterations: usize,
}

impl<C: Send> AgentLoop<C> {
    pub fn new(
        provider: Arc<dyn Provider>,
        context_builder: ContextBuilder,
        tool_registry: ToolRegistry<C>,
    ) -> Self {
        Self {
            provider,
            context_builder,
            tool_registry,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub async fn process(&self, ctx: &mut C, message: &str) -> Result<String> {
        self.process_with_history(ctx, message, &[]).await
    }

    pub async fn process_with_history(
        &self,
        ctx: &mut C,
        message: &str,
        history: &[ChatMessage],
    ) -> Result<String> {
        let mut messages = self.context_builder.build_messages(history, message);
        let tools = self.tool_registry.get_specs();

        for iteration in 1..=self.max_iterations {
            let request = ChatRequest {
                messages: &messages,
                tools: if tools.is_empty() {
                    None
                } else {
                    Some(tools.as_slice())
                },
            };

            let response = self.provider.chat(request).await?;

            let (assistant_text, tool_calls) = if response.has_tool_calls() {
                (response.text.unwrap_or_default(), response.tool_calls)
            } else if let Some(text) = &response.text {
                self.parse_tool_calls_fallback(text)
            } else {
                return Ok(NO_RESPONSE_REPLY.to_string());
            };

            if tool_calls.is_empty() {
                debug!(iteration, "agent produced final answer");
                return Ok(assistant_text);
            }

            messages.push(ChatMessage::assistant_with_tool_calls(
                assistant_text,
                tool_calls.clone(),
            ));

            for tool_call in tool_calls {
                info!(tool = %tool_call.name, args = %tool_call.arguments, "executing tool call");
                let result = self.run_tool_call(ctx, &tool_call).await;

                messages.push(ChatMessage::tool_result(
                    tool_call.id,
                    serde_json::to_string(&result).unwrap_or_default(),
                ));
            }
        }

        warn!(max = self.max_iterations, "agent hit iteration limit");
        Ok(MAX_ITERATIONS_REPLY.to_string())
    }

    async fn run_tool_call(&self, ctx: &mut C, tool_call: &ToolCall) -> ToolResult {
        let raw = if tool_call.arguments.trim().is_empty() {
            "{}"
        } else {
            tool_call.arguments.as_str()
        };

        match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(args) => self.tool_registry.execute(&tool_call.name, ctx, args).await,
            Err(e) => {
                warn!(tool = %tool_call.name, error = %e, "unparseable tool arguments");
                ToolResult::error(format!(
                    "Failed to parse tool arguments for {}: {}",
                    tool_call.name, e
                ))
            }
        }
    }

    /// Pulls `<tool_call>{...}</tool_call>` blocks out of plain text, for
    /// models that do not emit native function calls.
    fn parse_tool_calls_fallback(&self, response: &str) -> (String, Vec<ToolCall>) {
        let mut text_parts = Vec::new();
        let mut calls = Vec::new();
        let mut remaining = response;

        while let Some(start) = remaining.find(TOOL_CALL_OPEN_TAG) {
            let before = &remaining[..start];
            let after_open = &remaining[start + TOOL_CALL_OPEN_TAG.len()..];
            let Some(close_idx) = after_open.find(TOOL_CALL_CLOSE_TAG) else {
                break;
            };

            if !before.trim().is_empty() {
                text_parts.push(before.trim().to_string());
            }

            let inner = &after_open[..close_idx];
            calls.extend(
                extract_json_values(inner)
                    .iter()
                    .filter_map(parse_tool_call_value),
            );

            remaining = &after_open[close_idx + TOOL_CALL_CLOSE_TAG.len()..];
        }

        if !remaining.trim().is_empty() {
            text_parts.push(remaining.trim().to_string());
        }

        (text_parts.join("\n"), calls)
    }
}

fn extract_json_values(text: &str) -> Vec<serde_json::Value> {
    let mut values = Vec::new();
    let mut depth = 0usize;
    let mut start = None;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in text.char_indices() {
        match ch {
            '{' if !in_string => {
                if depth == 0 {
                    start = Some(i);
                }
                depth += 1;
            }
            '}' if !in_string && depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    if let Some(s) = start
                        && let Ok(value) = serde_json::from_str::<serde_json::Value>(&text[s..=i])
                    {
                        values.push(value);
                    }
                    start = None;
                }
            }
            '"' if !escape_next => {
                in_string = !in_string;
            }
            '\\' if in_string && !escape_next => {
                escape_next = true;
            }
            _ => {
                escape_next = false;
            }
        }
    }

    values
}

fn parse_tool_call_value(value: &serde_json::Value) -> Option<ToolCall> {
    let name = value.get("name")?.as_str()?.to_string();
    let arguments = value.get("arguments")?;
    let arguments = serde_json::to_string(arguments).ok()?;
    let id = format!("call_{:x}", md5::compute(arguments.as_bytes()));

    Some(ToolCall {
        id,
        name,
        arguments,
    })
}
