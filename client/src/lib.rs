//! Taskboard client - a shared todo board with lightweight identities.
//!
//! This crate provides the client side of a small collaborative todo list.
//! Users identify themselves with a display name only; the name stamps the
//! author of new items and gates who may edit or delete them.
//!
//! # Overview
//!
//! Items live in a remote collection resource. The [`store`] keeps a local
//! mirror of it and only changes that mirror after the backend has answered
//! a request with success. The [`session`] module holds the display name and
//! persists it across restarts. The [`tui`] module puts both behind a
//! terminal interface.
//!
//! # Modules
//!
//! - [`types`]: Todo item, creation draft and partial update
//! - [`config`]: Configuration from environment variables
//! - [`error`]: Error types for client operations
//! - [`backend`]: The backend seam with HTTP and in-memory implementations
//! - [`store`]: Local mirror of the collection with reconcile-on-success
//! - [`session`]: Display name session and its durable slot
//! - [`tui`]: Terminal user interface

pub mod backend;
pub mod config;
pub mod error;
pub mod session;
pub mod store;
pub mod tui;
pub mod types;

pub use backend::{HttpBackend, InMemoryBackend, TodoBackend};
pub use config::{BackendConfig, Config, ConfigError};
pub use error::{AppError, Operation, Result, SessionError, StoreError, TuiError};
pub use session::{FileSlot, MemorySlot, Session, SessionManager, SessionSlot};
pub use store::{StoreRequest, StoreResponse, TodoStore};
pub use types::{NewTodo, Todo, TodoPatch};
