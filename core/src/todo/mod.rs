pub mod store;

pub use store::{NO_TASKS, TodoStore};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TodoError {
    /// Position was not an integer, or outside `1..=len`.
    #[error("invalid index: {0:?}")]
    InvalidIndex(String),
}

/// What a single tool invocation asks the store to do.
///
/// Anything that is not a well-formed add or remove becomes `List`, so a
/// malformed call still yields a useful answer instead of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action<'a> {
    Add(&'a str),
    Remove(&'a str),
    List,
}

impl<'a> Action<'a> {
    pub fn parse(action: &str, item: Option<&'a str>) -> Self {
        let item = item.filter(|s| !s.is_empty());
        match (action, item) {
            ("add", Some(item)) => Self::Add(item),
            ("remove", Some(position)) => Self::Remove(position),
            _ => Self::List,
        }
    }
}
