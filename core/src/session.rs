use crate::agent::AgentLoop;
use crate::todo::TodoStore;
use crate::traits::ChatMessage;
use anyhow::Result;
use tracing::{info, instrument};
use uuid::Uuid;

pub const GREETING: &str = "👋 Hi there! I can add, remove, or list your tasks.";

const DEFAULT_MAX_HISTORY: usize = 50;

pub type SessionId = String;

/// Generate a unique session ID.
///
/// Format: session-{timestamp}-{random}
/// Example: session-1761520471-a3f9b2
pub fn generate_session_id() -> SessionId {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    let random = &Uuid::new_v4().simple().to_string()[..6];

    format!("session-{}-{}", timestamp, random)
}

/// One user's conversation: its task list and the turns exchanged so far.
///
/// The task list lives exactly as long as the session. Each turn borrows it
/// mutably for the duration of the agent run.
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    todos: TodoStore,
    history: Vec<ChatMessage>,
    max_history: usize,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: generate_session_id(),
            todos: TodoStore::new(),
            history: Vec::new(),
            max_history: DEFAULT_MAX_HISTORY,
        }
    }

    pub fn with_max_history(mut self, max: usize) -> Self {
        self.max_history = max;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn todos(&self) -> &TodoStore {
        &self.todos
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// Runs one turn through `agent` and records it.
    ///
    /// On error the history is left as it was; tool calls that already ran
    /// keep their effect on the task list.
    #[instrument(skip_all, fields(session = %self.id))]
    pub async fn handle_turn(
        &mut self,
        agent: &AgentLoop<TodoStore>,
        message: &str,
    ) -> Result<String> {
        let reply = agent
            .process_with_history(&mut self.todos, message, &self.history)
            .await?;

        self.history.push(ChatMessage::user(message));
        self.history.push(ChatMessage::assistant(reply.clone()));
        self.trim_history();

        info!(tasks = self.todos.len(), "turn complete");
        Ok(reply)
    }

    fn trim_history(&mut self) {
        if self.history.len() > self.max_history {
            let excess = self.history.len() - self.max_history;
            self.history.drain(..excess);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{ContextBuilder, ToolRegistry};
    use crate::tools::TodoManagerTool;
    use crate::traits::{ChatRequest, ChatResponse, Provider, ToolCall};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    /// Calls the todo tool with the user's message as JSON arguments, then
    /// echoes the tool output back as the final answer.
    #[derive(Default)]
    struct EchoToolProvider {
        seen_history: Mutex<Vec<usize>>,
    }

    #[async_trait]
    impl Provider for EchoToolProvider {
        fn name(&self) -> &str {
            "echo"
        }

        async fn chat(&self, request: ChatRequest<'_>) -> Result<ChatResponse> {
            let last = request.messages.last().expect("at least one message");
            if let Some(id) = &last.tool_call_id {
                let output: serde_json::Value = serde_json::from_str(&last.content)?;
                return Ok(ChatResponse::text(format!(
                    "{}: {}",
                    id,
                    output["output"].as_str().unwrap_or_default()
                )));
            }

            self.seen_history
                .lock()
                .unwrap()
                .push(request.messages.len());
            Ok(ChatResponse {
                text: None,
                tool_calls: vec![ToolCall {
                    id: "call".into(),
                    name: "todo_manager_tool".into(),
                    arguments: last.content.clone(),
                }],
            })
        }
    }

    fn agent(provider: Arc<EchoToolProvider>) -> AgentLoop<TodoStore> {
        let registry = ToolRegistry::new().with_tool(TodoManagerTool::new());
        AgentLoop::new(provider, ContextBuilder::new(), registry)
    }

    #[test]
    fn session_id_format() {
        let id = generate_session_id();
        let parts: Vec<&str> = id.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "session");
        assert!(parts[1].parse::<u64>().is_ok());
        assert_eq!(parts[2].len(), 6);
        assert_ne!(id, generate_session_id());
    }

    #[test]
    fn new_session_starts_empty() {
        let session = Session::new();
        assert!(session.todos().is_empty());
        assert!(session.history().is_empty());
    }

    #[tokio::test]
    async fn store_survives_across_turns() {
        let provider = Arc::new(EchoToolProvider::default());
        let agent = agent(provider.clone());
        let mut session = Session::new();

        let reply = session
            .handle_turn(&agent, r#"{"action":"add","item":"Write report"}"#)
            .await
            .unwrap();
        assert_eq!(reply, "call: ✅ Added 'Write report'.");

        session
            .handle_turn(&agent, r#"{"action":"add","item":"Call Bob"}"#)
            .await
            .unwrap();
        let reply = session
            .handle_turn(&agent, r#"{"action":"list"}"#)
            .await
            .unwrap();
        assert_eq!(reply, "call: 1. Write report\n2. Call Bob");
        assert_eq!(session.todos().len(), 2);

        // system + prior turns + current message
        assert_eq!(*provider.seen_history.lock().unwrap(), [2, 4, 6]);
    }

    #[tokio::test]
    async fn history_is_bounded() {
        let agent = agent(Arc::new(EchoToolProvider::default()));
        let mut session = Session::new().with_max_history(4);

        for _ in 0..5 {
            session
                .handle_turn(&agent, r#"{"action":"list"}"#)
                .await
                .unwrap();
        }
        assert_eq!(session.history().len(), 4);
        assert_eq!(session.history()[0].role, crate::traits::Role::User);
    }

    #[tokio::test]
    async fn failed_turn_keeps_history() {
        struct Down;

        #[async_trait]
        impl Provider for Down {
            fn name(&self) -> &str {
                "down"
            }

            async fn chat(&self, _request: ChatRequest<'_>) -> Result<ChatResponse> {
                anyhow::bail!("unreachable host")
            }
        }

        let agent = AgentLoop::new(
            Arc::new(Down),
            ContextBuilder::new(),
            ToolRegistry::new().with_tool(TodoManagerTool::new()),
        );
        let mut session = Session::new();
        assert!(session.handle_turn(&agent, "hello").await.is_err());
        assert!(session.history().is_empty());
    }
}
