//! Error types for the Taskboard client.
//!
//! This module defines the error types used throughout the client crate,
//! providing structured error handling with clear, human-readable messages.
//! Store failures carry the HTTP status and response body of the request
//! that failed so the UI can name the failed action.

use std::fmt;

use thiserror::Error;

use crate::config::ConfigError;

/// The store operation a request belonged to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Fetch,
    Create,
    Update,
    Delete,
}

impl Operation {
    /// Short verb used in user-facing notices ("Could not add todo").
    #[must_use]
    pub fn action(self) -> &'static str {
        match self {
            Self::Fetch => "load todos",
            Self::Create => "add todo",
            Self::Update => "update todo",
            Self::Delete => "delete todo",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Fetch => "fetch",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// Errors returned by the todo store and its backends.
///
/// A failed operation never modifies the local list.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Listing the collection returned a non-success status.
    #[error("failed to fetch todos: {status} - {body}")]
    Fetch { status: u16, body: String },

    /// Creating an item returned a non-success status.
    #[error("failed to create todo: {status} - {body}")]
    Create { status: u16, body: String },

    /// Updating an item returned a non-success status.
    #[error("failed to update todo: {status} - {body}")]
    Update { status: u16, body: String },

    /// Deleting an item returned a non-success status.
    #[error("failed to delete todo: {status} - {body}")]
    Delete { status: u16, body: String },

    /// The request could not be sent or no response was received.
    #[error("{operation} request failed: {source}")]
    Transport {
        operation: Operation,
        #[source]
        source: reqwest::Error,
    },

    /// The HTTP client could not be configured.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The collection URL cannot serve as a base for item URLs.
    #[error("invalid collection URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    /// The backend answered with success but the body could not be decoded.
    #[error("{operation} response could not be decoded: {source}")]
    Decode {
        operation: Operation,
        #[source]
        source: reqwest::Error,
    },

    /// Todo text is empty after trimming.
    #[error("todo text cannot be empty")]
    EmptyText,

    /// The item is not present in the local list.
    #[error("unknown todo: {0}")]
    UnknownItem(String),
}

impl StoreError {
    /// Builds the status failure variant matching `operation`.
    #[must_use]
    pub fn status(operation: Operation, status: u16, body: String) -> Self {
        match operation {
            Operation::Fetch => Self::Fetch { status, body },
            Operation::Create => Self::Create { status, body },
            Operation::Update => Self::Update { status, body },
            Operation::Delete => Self::Delete { status, body },
        }
    }

    /// Returns the HTTP status carried by the error, if any.
    #[must_use]
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Fetch { status, .. }
            | Self::Create { status, .. }
            | Self::Update { status, .. }
            | Self::Delete { status, .. } => Some(*status),
            Self::Transport { source, .. } | Self::Decode { source, .. } => {
                source.status().map(|s| s.as_u16())
            }
            Self::Client(_)
            | Self::InvalidUrl { .. }
            | Self::EmptyText
            | Self::UnknownItem(_) => None,
        }
    }
}

/// Errors from the durable session slot.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Reading or writing the slot file failed.
    #[error("session storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The slot file exists but does not contain a valid record.
    #[error("session storage is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Errors that can occur during TUI operation.
#[derive(Error, Debug)]
pub enum TuiError {
    /// Terminal initialization failed.
    #[error("failed to initialize terminal: {0}")]
    TerminalInit(#[source] std::io::Error),

    /// Terminal rendering failed.
    #[error("render error: {0}")]
    Render(#[source] std::io::Error),

    /// Event handling error.
    #[error("event error: {0}")]
    Event(String),
}

/// Errors that can occur anywhere in the client.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Store or backend error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Session persistence error.
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// TUI-related error.
    #[error("TUI error: {0}")]
    Tui(#[from] TuiError),
}

/// A specialized `Result` type for client operations.
pub type Result<T> = std::result::Result<T, AppError>;
