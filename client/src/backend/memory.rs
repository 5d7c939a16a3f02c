//! In-memory todo collection.
//!
//! Backs the offline mode of the client and the store tests. It behaves like
//! the remote resource: identifiers are assigned on create, unknown ids answer
//! with a 404 failure, and updates return the full item.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use super::TodoBackend;
use crate::error::{Operation, StoreError};
use crate::types::{NewTodo, Todo, TodoPatch};

/// Status returned for identifiers that are not in the collection.
const NOT_FOUND: u16 = 404;

/// Process-local collection of todo items.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    items: Mutex<Vec<Todo>>,
}

impl InMemoryBackend {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a collection pre-populated with `items`, in order.
    #[must_use]
    pub fn with_items(items: Vec<Todo>) -> Self {
        Self {
            items: Mutex::new(items),
        }
    }

    /// Returns a copy of the stored items.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Todo> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Todo>> {
        self.items.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn not_found(operation: Operation, id: &str) -> StoreError {
        StoreError::status(operation, NOT_FOUND, format!("todo {id} not found"))
    }
}

#[async_trait]
impl TodoBackend for InMemoryBackend {
    async fn list(&self) -> Result<Vec<Todo>, StoreError> {
        Ok(self.snapshot())
    }

    async fn create(&self, draft: &NewTodo) -> Result<Todo, StoreError> {
        let todo = draft.clone().into_todo(Uuid::new_v4().to_string());
        debug!(id = %todo.id, "Stored todo in memory");
        self.lock().push(todo.clone());
        Ok(todo)
    }

    async fn update(&self, id: &str, patch: &TodoPatch) -> Result<Todo, StoreError> {
        let mut items = self.lock();
        let todo = items
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| Self::not_found(Operation::Update, id))?;
        patch.apply_to(todo);
        Ok(todo.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut items = self.lock();
        let index = items
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| Self::not_found(Operation::Delete, id))?;
        items.remove(index);
        Ok(())
    }
}
