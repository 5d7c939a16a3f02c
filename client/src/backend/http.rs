//! HTTP backend for a remote todo collection.
//!
//! This module talks to a REST-style collection resource with:
//!
//! - Connection pooling via reqwest
//! - JSON request and response bodies
//! - Status mapping into [`StoreError`] (status code + response body)
//!
//! Requests are never retried. A non-2xx answer is reported to the caller,
//! which leaves its local state untouched.
//!
//! # Example
//!
//! ```no_run
//! use taskboard_client::backend::{HttpBackend, TodoBackend};
//! use taskboard_client::types::NewTodo;
//!
//! #[tokio::main]
//! async fn main() {
//!     let backend = HttpBackend::new("https://api.example.com/todos", None).unwrap();
//!     let created = backend.create(&NewTodo::new("Buy milk", "Alice")).await.unwrap();
//!     println!("created {}", created.id);
//! }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderValue, CACHE_CONTROL};
use reqwest::{Client, Response, Url};
use tracing::{debug, warn};

use super::TodoBackend;
use crate::error::{Operation, StoreError};
use crate::types::{NewTodo, Todo, TodoPatch};

/// REST client for the todo collection resource.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    /// Creates a backend for the collection at `base_url`.
    ///
    /// A trailing `/` on `base_url` is dropped so item URLs are always
    /// `{base_url}/{id}`. The id is percent-encoded as a single path segment.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidUrl` if `base_url` is not an absolute
    /// hierarchical URL, or `StoreError::Client` if the underlying client
    /// cannot be built.
    pub fn new(base_url: &str, request_timeout: Option<Duration>) -> Result<Self, StoreError> {
        let base_url = Self::parse_base_url(base_url)?;

        let mut builder = Client::builder().pool_max_idle_per_host(10);
        if let Some(timeout) = request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(StoreError::Client)?;

        Ok(Self { client, base_url })
    }

    /// Returns the collection URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    fn parse_base_url(raw: &str) -> Result<Url, StoreError> {
        let invalid = |message: String| StoreError::InvalidUrl {
            url: raw.to_string(),
            message,
        };

        let mut url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| invalid("cannot be used as a base URL".to_string()))?
            .pop_if_empty();
        Ok(url)
    }

    fn item_url(&self, id: &str) -> Url {
        let mut url = self.base_url.clone();
        // Checked hierarchical in `parse_base_url`.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(id);
        }
        url
    }

    /// Turns a send result into a success response or a store error.
    async fn check(
        operation: Operation,
        result: Result<Response, reqwest::Error>,
    ) -> Result<Response, StoreError> {
        let response = result.map_err(|source| {
            warn!(%operation, error = %source, "Request failed");
            StoreError::Transport { operation, source }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!(
            %operation,
            status = status.as_u16(),
            body = %body,
            "Backend rejected request"
        );
        Err(StoreError::status(operation, status.as_u16(), body))
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        operation: Operation,
        response: Response,
    ) -> Result<T, StoreError> {
        response
            .json::<T>()
            .await
            .map_err(|source| StoreError::Decode { operation, source })
    }
}

#[async_trait]
impl TodoBackend for HttpBackend {
    async fn list(&self) -> Result<Vec<Todo>, StoreError> {
        debug!(url = %self.base_url, "Fetching todos");
        let result = self
            .client
            .get(self.base_url.clone())
            .header(CACHE_CONTROL, HeaderValue::from_static("no-store"))
            .send()
            .await;
        let response = Self::check(Operation::Fetch, result).await?;
        Self::decode(Operation::Fetch, response).await
    }

    async fn create(&self, draft: &NewTodo) -> Result<Todo, StoreError> {
        debug!(url = %self.base_url, author = %draft.author, "Creating todo");
        let result = self.client.post(self.base_url.clone()).json(draft).send().await;
        let response = Self::check(Operation::Create, result).await?;
        Self::decode(Operation::Create, response).await
    }

    async fn update(&self, id: &str, patch: &TodoPatch) -> Result<Todo, StoreError> {
        let url = self.item_url(id);
        debug!(url = %url, "Updating todo");
        let result = self.client.put(url).json(patch).send().await;
        let response = Self::check(Operation::Update, result).await?;
        Self::decode(Operation::Update, response).await
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let url = self.item_url(id);
        debug!(url = %url, "Deleting todo");
        let result = self.client.delete(url).send().await;
        Self::check(Operation::Delete, result).await?;
        Ok(())
    }
}
