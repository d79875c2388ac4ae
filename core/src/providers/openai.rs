use crate::traits::{ChatMessage, ChatRequest, ChatResponse, Provider, Role, ToolCall, ToolSpec};
use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

#[derive(Debug, Serialize)]
struct OpenAIRequest<'a> {
    model: &'a str,
    messages: Vec<OpenAIMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<OpenAITool<'a>>>,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct OpenAIMessage<'a> {
    role: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<OpenAIToolCallRequest<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct OpenAIToolCallRequest<'a> {
    id: &'a str,
    r#type: &'a str,
    function: OpenAIFunctionRequest<'a>,
}

#[derive(Debug, Serialize)]
struct OpenAIFunctionRequest<'a> {
    name: &'a str,
    arguments: &'a str,
}

#[derive(Debug, Serialize)]
struct OpenAITool<'a> {
    r#type: &'a str,
    function: OpenAIToolFunction<'a>,
}

#[derive(Debug, Serialize)]
struct OpenAIToolFunction<'a> {
    name: &'a str,
    description: &'a str,
    parameters: &'a serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponseMessage {
    content: Option<String>,
    tool_calls: Option<Vec<OpenAIToolCall>>,
}

#[derive(Debug, Deserialize)]
struct OpenAIToolCall {
    #[serde(default)]
    id: String,
    function: OpenAIFunction,
}

#[derive(Debug, Deserialize)]
struct OpenAIFunction {
    name: String,
    #[serde(default)]
    arguments: String,
}

/// Any backend speaking the OpenAI chat-completions protocol, Gemini's
/// compatibility endpoint included.
pub struct OpenAIProvider {
    name: String,
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    temperature: f64,
}

impl OpenAIProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self {
            name: "openai".to_string(),
            client,
            api_key: api_key.into(),
            model: "gpt-4o".to_string(),
            base_url: OPENAI_BASE_URL.to_string(),
            temperature: 1.0,
        }
    }

    pub fn gemini(api_key: impl Into<String>) -> Self {
        Self::new(api_key)
            .with_name("gemini")
            .with_model("gemini-2.0-flash")
            .with_base_url(GEMINI_BASE_URL)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_request<'a>(&'a self, request: &ChatRequest<'a>) -> OpenAIRequest<'a> {
        OpenAIRequest {
            model: &self.model,
            messages: convert_messages(request.messages),
            tools: request.tools.map(convert_tools),
            temperature: self.temperature,
        }
    }
}

fn convert_messages(messages: &[ChatMessage]) -> Vec<OpenAIMessage<'_>> {
    messages
        .iter()
        .map(|m| {
            let tool_calls = m.tool_calls.as_ref().map(|tool_calls| {
                tool_calls
                    .iter()
                    .map(|tc| OpenAIToolCallRequest {
                        id: &tc.id,
                        r#type: "function",
                        function: OpenAIFunctionRequest {
                            name: &tc.name,
                            arguments: &tc.arguments,
                        },
                    })
                    .collect()
            });

            // An assistant turn that only carries tool calls has no content.
            let content = if m.role == Role::Assistant && tool_calls.is_some() && m.content.is_empty()
            {
                None
            } else {
                Some(m.content.as_str())
            };

            OpenAIMessage {
                role: m.role.as_str(),
                content,
                tool_calls,
                tool_call_id: m.tool_call_id.as_deref(),
            }
        })
        .collect()
}

fn convert_tools(tools: &[ToolSpec]) -> Vec<OpenAITool<'_>> {
    tools
        .iter()
        .map(|t| OpenAITool {
            r#type: "function",
            function: OpenAIToolFunction {
                name: &t.name,
                description: &t.description,
                parameters: &t.parameters_schema,
            },
        })
        .collect()
}

fn parse_response(response: OpenAIResponse) -> anyhow::Result<ChatResponse> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| anyhow::anyhow!("No choices in response"))?;

    let tool_calls: Vec<ToolCall> = choice
        .message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(i, c)| ToolCall {
            id: if c.id.is_empty() {
                format!("call_{}", i)
            } else {
                c.id
            },
            name: c.function.name,
            arguments: c.function.arguments,
        })
        .collect();

    let has_content = choice
        .message
        .content
        .as_ref()
        .is_some_and(|c| !c.trim().is_empty());
    if !has_content && tool_calls.is_empty() {
        return Err(anyhow::anyhow!(
            "Empty response from API: no content or tool calls"
        ));
    }

    Ok(ChatResponse {
        text: choice.message.content,
        tool_calls,
    })
}

#[async_trait]
impl Provider for OpenAIProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn chat(&self, request: ChatRequest<'_>) -> anyhow::Result<ChatResponse> {
        let body = self.build_request(&request);
        debug!(
            provider = %self.name,
            model = %self.model,
            messages = body.messages.len(),
            "sending chat request"
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("Failed to reach {} at {}", self.name, self.base_url))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "{} API error {}: {}",
                self.name,
                status,
                error_text
            ));
        }

        let parsed: OpenAIResponse = response
            .json()
            .await
            .with_context(|| format!("Invalid response body from {}", self.name))?;

        parse_response(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn gemini_preset() {
        let provider = OpenAIProvider::gemini("key");
        assert_eq!(provider.name(), "gemini");
        assert_eq!(provider.model(), "gemini-2.0-flash");
        assert_eq!(provider.base_url(), GEMINI_BASE_URL);
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let provider = OpenAIProvider::new("key").with_base_url("http://localhost:8080/v1/");
        assert_eq!(provider.base_url(), "http://localhost:8080/v1");
    }

    #[test]
    fn request_serializes_tools_and_tool_turns() {
        let provider = OpenAIProvider::new("key").with_model("m").with_temperature(0.5);
        let call = ToolCall {
            id: "call_1".into(),
            name: "todo_manager_tool".into(),
            arguments: r#"{"action":"list"}"#.into(),
        };
        let messages = vec![
            ChatMessage::user("what's on my list?"),
            ChatMessage::assistant_with_tool_calls("", vec![call]),
            ChatMessage::tool_result("call_1".into(), "📭 No tasks."),
        ];
        let tools = vec![ToolSpec {
            name: "todo_manager_tool".into(),
            description: "todos".into(),
            parameters_schema: json!({"type": "object"}),
        }];
        let request = ChatRequest {
            messages: &messages,
            tools: Some(&tools),
        };

        let body = serde_json::to_value(provider.build_request(&request)).unwrap();
        assert_eq!(body["model"], "m");
        assert_eq!(body["temperature"], 0.5);
        assert_eq!(body["tools"][0]["type"], "function");
        assert_eq!(body["tools"][0]["function"]["name"], "todo_manager_tool");
        assert!(body["messages"][1].get("content").is_none());
        assert_eq!(body["messages"][1]["tool_calls"][0]["function"]["arguments"], r#"{"action":"list"}"#);
        assert_eq!(body["messages"][2]["role"], "tool");
        assert_eq!(body["messages"][2]["tool_call_id"], "call_1");
    }

    #[test]
    fn request_without_tools_omits_field() {
        let provider = OpenAIProvider::new("key");
        let messages = vec![ChatMessage::user("hi")];
        let request = ChatRequest {
            messages: &messages,
            tools: None,
        };
        let body = serde_json::to_value(provider.build_request(&request)).unwrap();
        assert!(body.get("tools").is_none());
    }

    #[test]
    fn parses_tool_calls() {
        let raw = json!({
            "choices": [{
                "message": {
                    "content": null,
                    "tool_calls": [{
                        "id": "",
                        "type": "function",
                        "function": {"name": "todo_manager_tool", "arguments": "{\"action\":\"list\"}"}
                    }]
                }
            }]
        });
        let response = parse_response(serde_json::from_value(raw).unwrap()).unwrap();
        assert!(response.has_tool_calls());
        assert_eq!(response.tool_calls[0].id, "call_0");
        assert_eq!(response.text_or_empty(), "");
    }

    #[test]
    fn empty_response_is_error() {
        let raw = json!({"choices": [{"message": {"content": "  "}}]});
        assert!(parse_response(serde_json::from_value(raw).unwrap()).is_err());

        let raw = json!({"choices": []});
        assert!(parse_response(serde_json::from_value(raw).unwrap()).is_err());
    }
}
