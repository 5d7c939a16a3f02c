//! Todo store client.
//!
//! [`TodoStore`] owns the local snapshot of the collection and mirrors it from
//! a [`TodoBackend`]. Every operation issues exactly one backend request and
//! only touches the local list after the backend has answered with success:
//!
//! | Operation | Request | On success |
//! |-----------|---------|------------|
//! | [`list_all`](TodoStore::list_all) | `GET {base}` | local list replaced, server order kept |
//! | [`create`](TodoStore::create) | `POST {base}` | returned item appended |
//! | [`update`](TodoStore::update) | `PUT {base}/{id}` | matching item replaced by the returned one |
//! | [`delete`](TodoStore::delete) | `DELETE {base}/{id}` | matching item removed |
//!
//! On failure the local list is left exactly as it was.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use taskboard_client::backend::InMemoryBackend;
//! use taskboard_client::store::TodoStore;
//! use taskboard_client::types::TodoPatch;
//!
//! # tokio_test::block_on(async {
//! let mut store = TodoStore::new(Arc::new(InMemoryBackend::new()));
//! let todo = store.create("Buy milk", "Alice").await.unwrap();
//! store.update(&todo.id, &TodoPatch::completed(true)).await.unwrap();
//! assert!(store.get(&todo.id).unwrap().completed);
//! # });
//! ```

use std::sync::Arc;

use tracing::{debug, info};

use crate::backend::TodoBackend;
use crate::error::{Operation, StoreError};
use crate::types::{NewTodo, Todo, TodoPatch};

/// A single backend request, detached from the store.
///
/// Requests own their data so they can be sent from another task; the answer
/// is folded back in with [`TodoStore::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreRequest {
    List,
    Create(NewTodo),
    Update { id: String, patch: TodoPatch },
    Delete { id: String },
}

/// Successful answer to a [`StoreRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreResponse {
    Listed(Vec<Todo>),
    Created(Todo),
    Updated(Todo),
    Deleted(String),
}

impl StoreRequest {
    #[must_use]
    pub fn operation(&self) -> Operation {
        match self {
            Self::List => Operation::Fetch,
            Self::Create(_) => Operation::Create,
            Self::Update { .. } => Operation::Update,
            Self::Delete { .. } => Operation::Delete,
        }
    }

    /// Sends the request. Nothing local is modified.
    ///
    /// # Errors
    ///
    /// Returns whatever the backend reports for the operation.
    pub async fn send(self, backend: &dyn TodoBackend) -> Result<StoreResponse, StoreError> {
        match self {
            Self::List => backend.list().await.map(StoreResponse::Listed),
            Self::Create(draft) => backend.create(&draft).await.map(StoreResponse::Created),
            Self::Update { id, patch } => backend
                .update(&id, &patch)
                .await
                .map(StoreResponse::Updated),
            Self::Delete { id } => {
                backend.delete(&id).await?;
                Ok(StoreResponse::Deleted(id))
            }
        }
    }
}

/// Local mirror of the todo collection.
pub struct TodoStore {
    backend: Arc<dyn TodoBackend>,
    items: Vec<Todo>,
}

impl TodoStore {
    /// Creates a store with an empty local list.
    #[must_use]
    pub fn new(backend: Arc<dyn TodoBackend>) -> Self {
        Self {
            backend,
            items: Vec::new(),
        }
    }

    /// Returns a handle to the backend.
    #[must_use]
    pub fn backend(&self) -> Arc<dyn TodoBackend> {
        Arc::clone(&self.backend)
    }

    /// Items in display order.
    #[must_use]
    pub fn items(&self) -> &[Todo] {
        &self.items
    }

    /// Looks up a local item by identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Todo> {
        self.items.iter().find(|t| t.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drops the local snapshot. The backend is not touched.
    pub fn clear_local(&mut self) {
        self.items.clear();
    }

    /// Fetches the whole collection and replaces the local list with it.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Fetch` on a non-success status; the local list is
    /// unchanged.
    pub async fn list_all(&mut self) -> Result<&[Todo], StoreError> {
        let items = self.backend.list().await?;
        self.replace_all(items);
        Ok(&self.items)
    }

    /// Creates an item authored by `author` and appends the stored version.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::EmptyText` without sending anything if `text` is
    /// blank, or `StoreError::Create` on a non-success status.
    pub async fn create(&mut self, text: &str, author: &str) -> Result<Todo, StoreError> {
        let draft = Self::draft(text, author)?;
        let todo = self.backend.create(&draft).await?;
        self.reconcile_created(todo.clone());
        Ok(todo)
    }

    /// Sends a partial update and replaces the local item with the result.
    ///
    /// Unknown identifiers are not checked locally; the backend decides.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Update` on a non-success status.
    pub async fn update(&mut self, id: &str, patch: &TodoPatch) -> Result<Todo, StoreError> {
        let todo = self.backend.update(id, patch).await?;
        self.reconcile_updated(todo.clone());
        Ok(todo)
    }

    /// Flips the completion state of a local item.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::UnknownItem` if `id` is not in the local list,
    /// otherwise whatever [`update`](Self::update) returns.
    pub async fn toggle(&mut self, id: &str) -> Result<Todo, StoreError> {
        let completed = self.completion_of(id)?;
        self.update(id, &TodoPatch::completed(!completed)).await
    }

    /// Deletes an item and removes it from the local list.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Delete` on a non-success status.
    pub async fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        self.backend.delete(id).await?;
        self.reconcile_deleted(id);
        Ok(())
    }

    /// Builds a create request, rejecting blank text.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::EmptyText` if `text` is blank.
    pub fn create_request(text: &str, author: &str) -> Result<StoreRequest, StoreError> {
        Self::draft(text, author).map(StoreRequest::Create)
    }

    /// Builds the request that flips the completion state of a local item.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::UnknownItem` if `id` is not in the local list.
    pub fn toggle_request(&self, id: &str) -> Result<StoreRequest, StoreError> {
        let completed = self.completion_of(id)?;
        Ok(StoreRequest::Update {
            id: id.to_string(),
            patch: TodoPatch::completed(!completed),
        })
    }

    /// Folds a successful response into the local list.
    pub fn apply(&mut self, response: StoreResponse) {
        match response {
            StoreResponse::Listed(items) => self.replace_all(items),
            StoreResponse::Created(todo) => self.reconcile_created(todo),
            StoreResponse::Updated(todo) => self.reconcile_updated(todo),
            StoreResponse::Deleted(id) => self.reconcile_deleted(&id),
        }
    }

    fn draft(text: &str, author: &str) -> Result<NewTodo, StoreError> {
        if text.trim().is_empty() {
            return Err(StoreError::EmptyText);
        }
        Ok(NewTodo::new(text, author))
    }

    fn completion_of(&self, id: &str) -> Result<bool, StoreError> {
        self.get(id)
            .map(|t| t.completed)
            .ok_or_else(|| StoreError::UnknownItem(id.to_string()))
    }

    /// Replaces the local list with a fetched collection.
    pub fn replace_all(&mut self, items: Vec<Todo>) {
        debug!(count = items.len(), "Local list replaced");
        self.items = items;
    }

    /// Appends an item returned by a successful create.
    pub fn reconcile_created(&mut self, todo: Todo) {
        info!(id = %todo.id, author = %todo.author, "Todo created");
        self.items.push(todo);
    }

    /// Replaces the local item with the representation returned by an update.
    ///
    /// An item the local list does not know yet is appended.
    pub fn reconcile_updated(&mut self, todo: Todo) {
        info!(id = %todo.id, completed = todo.completed, "Todo updated");
        match self.items.iter_mut().find(|t| t.id == todo.id) {
            Some(existing) => *existing = todo,
            None => self.items.push(todo),
        }
    }

    /// Removes the item deleted on the backend.
    pub fn reconcile_deleted(&mut self, id: &str) {
        info!(id = %id, "Todo deleted");
        self.items.retain(|t| t.id != id);
    }
}

impl std::fmt::Debug for TodoStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoStore")
            .field("items", &self.items)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::InMemoryBackend;

    fn seeded_store() -> (Arc<InMemoryBackend>, TodoStore) {
        let backend = Arc::new(InMemoryBackend::with_items(vec![
            NewTodo::new("Buy milk", "Alice").into_todo("1".to_string()),
            NewTodo::new("Walk dog", "Bob").into_todo("2".to_string()),
        ]));
        let store = TodoStore::new(backend.clone());
        (backend, store)
    }

    #[tokio::test]
    async fn list_all_mirrors_backend_order() {
        let (backend, mut store) = seeded_store();
        store.list_all().await.unwrap();
        assert_eq!(store.items(), backend.snapshot().as_slice());
    }

    #[tokio::test]
    async fn create_appends_server_item() {
        let (_, mut store) = seeded_store();
        store.list_all().await.unwrap();

        let created = store.create("Read book", "Carol").await.unwrap();

        assert_eq!(store.len(), 3);
        assert_eq!(store.items().last(), Some(&created));
        assert_eq!(created.author, "Carol");
        assert!(!created.completed);
    }

    #[tokio::test]
    async fn create_rejects_blank_text_without_request() {
        let (backend, mut store) = seeded_store();
        let err = store.create("   ", "Alice").await.unwrap_err();

        assert!(matches!(err, StoreError::EmptyText));
        assert_eq!(backend.snapshot().len(), 2);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn toggle_flips_completion() {
        let (_, mut store) = seeded_store();
        store.list_all().await.unwrap();

        let toggled = store.toggle("1").await.unwrap();
        assert!(toggled.completed);
        assert!(store.get("1").unwrap().completed);

        let toggled = store.toggle("1").await.unwrap();
        assert!(!toggled.completed);
    }

    #[tokio::test]
    async fn toggle_unknown_local_item() {
        let (_, mut store) = seeded_store();
        let err = store.toggle("1").await.unwrap_err();
        assert!(matches!(err, StoreError::UnknownItem(ref id) if id == "1"));
    }

    #[tokio::test]
    async fn update_failure_leaves_list_unchanged() {
        let (_, mut store) = seeded_store();
        store.list_all().await.unwrap();
        let before = store.items().to_vec();

        let err = store
            .update("missing", &TodoPatch::text("x"))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Update { status: 404, .. }));
        assert_eq!(store.items(), before.as_slice());
    }

    #[tokio::test]
    async fn delete_removes_local_item() {
        let (_, mut store) = seeded_store();
        store.list_all().await.unwrap();

        store.delete("2").await.unwrap();

        assert_eq!(store.len(), 1);
        assert!(store.get("2").is_none());
    }

    #[tokio::test]
    async fn detached_request_applies_like_direct_call() {
        let (backend, mut store) = seeded_store();
        store.list_all().await.unwrap();

        let request = store.toggle_request("2").unwrap();
        assert_eq!(request.operation(), Operation::Update);
        let response = request.send(backend.as_ref()).await.unwrap();
        store.apply(response);

        assert!(store.get("2").unwrap().completed);
        assert_eq!(store.items(), backend.snapshot().as_slice());
    }

    #[tokio::test]
    async fn detached_delete_reports_removed_id() {
        let (backend, mut store) = seeded_store();
        store.list_all().await.unwrap();

        let response = StoreRequest::Delete { id: "1".to_string() }
            .send(backend.as_ref())
            .await
            .unwrap();
        assert_eq!(response, StoreResponse::Deleted("1".to_string()));

        store.apply(response);
        assert!(store.get("1").is_none());
    }

    #[test]
    fn create_request_rejects_blank_text() {
        assert!(matches!(
            TodoStore::create_request(" ", "Alice"),
            Err(StoreError::EmptyText)
        ));
        assert_eq!(
            TodoStore::create_request("Buy milk", "Alice").unwrap(),
            StoreRequest::Create(NewTodo::new("Buy milk", "Alice"))
        );
    }

    #[test]
    fn reconcile_updated_appends_unknown_item() {
        let (_, mut store) = seeded_store();
        let todo = NewTodo::new("Late arrival", "Dan").into_todo("9".to_string());

        store.reconcile_updated(todo.clone());

        assert_eq!(store.items(), &[todo]);
    }

    #[test]
    fn clear_local_keeps_backend() {
        let (backend, mut store) = seeded_store();
        store.replace_all(backend.snapshot());

        store.clear_local();

        assert!(store.is_empty());
        assert_eq!(backend.snapshot().len(), 2);
    }
}
