//! Store backends for the todo collection.
//!
//! The [`TodoBackend`] trait is the seam between the [`TodoStore`] and the
//! place items actually live. Each method maps to exactly one request against
//! the collection resource and returns the backend's authoritative answer.
//!
//! - [`HttpBackend`]: remote REST collection (`GET`/`POST` on the collection,
//!   `PUT`/`DELETE` on `{collection}/{id}`)
//! - [`InMemoryBackend`]: process-local collection for offline use and tests
//!
//! [`TodoStore`]: crate::store::TodoStore

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::BackendConfig;
use crate::error::StoreError;
use crate::types::{NewTodo, Todo, TodoPatch};

pub mod http;
pub mod memory;

pub use http::HttpBackend;
pub use memory::InMemoryBackend;

/// A collection of todo items addressable by identifier.
#[async_trait]
pub trait TodoBackend: Send + Sync {
    /// Returns every item in backend order.
    async fn list(&self) -> Result<Vec<Todo>, StoreError>;

    /// Stores a new item and returns it with its assigned identifier.
    async fn create(&self, draft: &NewTodo) -> Result<Todo, StoreError>;

    /// Applies a partial update and returns the full updated item.
    async fn update(&self, id: &str, patch: &TodoPatch) -> Result<Todo, StoreError>;

    /// Removes an item.
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}

/// Builds the backend selected by the configuration.
///
/// # Errors
///
/// Returns `StoreError::InvalidUrl` if the collection URL is unusable, or
/// `StoreError::Client` if the HTTP client cannot be constructed.
pub fn from_config(config: &BackendConfig) -> Result<Arc<dyn TodoBackend>, StoreError> {
    match config {
        BackendConfig::Http {
            api_url,
            request_timeout,
        } => Ok(Arc::new(HttpBackend::new(api_url, *request_timeout)?)),
        BackendConfig::InMemory => Ok(Arc::new(InMemoryBackend::new())),
    }
}
