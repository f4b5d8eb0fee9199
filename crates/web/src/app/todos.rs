use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;

use taskdesk_core::{CoreError, CoreResult, ObjectId, TodoId};

const MAX_DESCRIPTION_LEN: usize = 280;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TodoItem {
    pub id: TodoId,
    pub owner: ObjectId,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Per-user todo items, in memory.
#[derive(Debug, Default)]
pub struct TodoStore {
    items: Mutex<Vec<TodoItem>>,
}

impl TodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, owner: ObjectId, description: &str) -> CoreResult<TodoItem> {
        let description = description.trim();
        if description.is_empty() {
            return Err(CoreError::validation("description must not be empty"));
        }
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(CoreError::validation(format!(
                "description must be at most {MAX_DESCRIPTION_LEN} characters"
            )));
        }

        let item = TodoItem {
            id: TodoId::new(),
            owner,
            description: description.to_string(),
            created_at: Utc::now(),
        };
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(item.clone());
        Ok(item)
    }

    /// Items owned by `owner`, oldest first.
    pub fn list(&self, owner: ObjectId) -> Vec<TodoItem> {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|item| item.owner == owner)
            .cloned()
            .collect()
    }
}
