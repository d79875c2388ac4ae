pub mod agent;
pub mod config;
pub mod providers;
pub mod session;
pub mod todo;
pub mod tools;
pub mod traits;

pub use agent::{AgentLoop, ContextBuilder, ToolRegistry};
pub use config::Config;
pub use providers::*;
pub use session::{GREETING, Session};
pub use todo::{Action, TodoError, TodoStore};
pub use tools::*;
pub use traits::*;
