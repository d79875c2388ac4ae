use crate::todo::TodoError;

pub const NO_TASKS: &str = "📭 No tasks.";

/// Ordered task list for one session.
///
/// Positions shown to the user are always `index + 1`, recomputed on every
/// listing, so removing an item shifts the positions of everything after it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoStore {
    items: Vec<String>,
}

impl TodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn add(&mut self, item: &str) -> String {
        self.items.push(item.to_string());
        format!("✅ Added '{}'.", item)
    }

    /// Removes the item at a 1-based `position` given as text.
    ///
    /// Leaves the store untouched when `position` is not an integer or falls
    /// outside `1..=len`.
    pub fn remove(&mut self, position: &str) -> Result<String, TodoError> {
        let invalid = || TodoError::InvalidIndex(position.to_string());

        let position: i64 = position.trim().parse().map_err(|_| invalid())?;
        let index = position
            .checked_sub(1)
            .and_then(|i| usize::try_from(i).ok())
            .ok_or_else(invalid)?;
        if index >= self.items.len() {
            return Err(invalid());
        }

        let removed = self.items.remove(index);
        Ok(format!("🗑️ Removed '{}'.", removed))
    }

    pub fn list(&self) -> String {
        if self.items.is_empty() {
            return NO_TASKS.to_string();
        }

        self.items
            .iter()
            .enumerate()
            .map(|(i, item)| format!("{}. {}", i + 1, item))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
