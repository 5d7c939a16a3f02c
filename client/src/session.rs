//! Session manager: who is using the client right now.
//!
//! A session is nothing more than a display name entered by the user. There
//! is no authentication; the name is used to stamp the author of new items
//! and to decide which items the user may edit or delete.
//!
//! # Persistence
//!
//! The name survives restarts through a [`SessionSlot`], a single durable
//! key-value slot. [`FileSlot`] stores it as `session.json` in the state
//! directory; [`MemorySlot`] keeps it in process for tests.
//!
//! # States
//!
//! ```text
//! +-----------+   login(name) / restore()   +----------+
//! | LoggedOut | --------------------------> | LoggedIn |
//! +-----------+ <-------------------------- +----------+
//!                        logout()
//! ```
//!
//! Slot failures are logged and never fail a login or logout.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::SessionError;
use crate::types::Todo;

/// The locally held identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// Trimmed name entered by the user. Empty when logged out.
    pub display_name: String,

    /// Whether a name has been accepted.
    pub logged_in: bool,
}

/// On-disk record stored in the slot.
#[derive(Debug, Serialize, Deserialize)]
struct SessionRecord {
    display_name: String,
}

/// A durable slot holding the current display name.
pub trait SessionSlot: Send + Sync {
    /// Reads the stored name, `None` if nothing is stored.
    fn read(&self) -> Result<Option<String>, SessionError>;

    /// Stores `name`, replacing any previous value.
    fn write(&self, name: &str) -> Result<(), SessionError>;

    /// Removes the stored name. Clearing an empty slot succeeds.
    fn clear(&self) -> Result<(), SessionError>;
}

/// Slot backed by a JSON file.
#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionSlot for FileSlot {
    fn read(&self) -> Result<Option<String>, SessionError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let record: SessionRecord = serde_json::from_str(&contents)?;
        Ok(Some(record.display_name))
    }

    fn write(&self, name: &str) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let record = SessionRecord {
            display_name: name.to_string(),
        };
        fs::write(&self.path, serde_json::to_vec(&record)?)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Slot kept in process memory.
#[derive(Debug, Default)]
pub struct MemorySlot {
    value: Mutex<Option<String>>,
}

impl MemorySlot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_value<R>(&self, f: impl FnOnce(&mut Option<String>) -> R) -> R {
        let mut guard = self.value.lock().unwrap_or_else(|p| p.into_inner());
        f(&mut guard)
    }
}

impl SessionSlot for MemorySlot {
    fn read(&self) -> Result<Option<String>, SessionError> {
        Ok(self.with_value(|v| v.clone()))
    }

    fn write(&self, name: &str) -> Result<(), SessionError> {
        self.with_value(|v| *v = Some(name.to_string()));
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        self.with_value(|v| *v = None);
        Ok(())
    }
}

/// Holds the current session and keeps the slot in sync with it.
pub struct SessionManager {
    session: Session,
    slot: Box<dyn SessionSlot>,
}

impl SessionManager {
    /// Creates a logged-out manager over `slot`.
    #[must_use]
    pub fn new(slot: Box<dyn SessionSlot>) -> Self {
        Self {
            session: Session::default(),
            slot,
        }
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.session.logged_in
    }

    /// The current display name, empty when logged out.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.session.display_name
    }

    /// Logs in as `name`.
    ///
    /// Returns `false` and leaves the session unchanged if `name` is blank.
    /// Logging in while already logged in starts a fresh session under the
    /// new name.
    pub fn login(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            debug!("Ignoring login with empty name");
            return false;
        }

        self.session = Session {
            display_name: name.to_string(),
            logged_in: true,
        };
        if let Err(e) = self.slot.write(name) {
            warn!(error = %e, "Failed to persist session name");
        }
        info!(user = %name, "Logged in");
        true
    }

    /// Ends the session and clears the slot.
    ///
    /// The caller is responsible for discarding the local todo list.
    pub fn logout(&mut self) {
        if self.session.logged_in {
            info!(user = %self.session.display_name, "Logged out");
        }
        self.session = Session::default();
        if let Err(e) = self.slot.clear() {
            warn!(error = %e, "Failed to clear persisted session");
        }
    }

    /// Logs in with the persisted name, if there is one.
    ///
    /// Returns `true` if a session was restored.
    pub fn restore(&mut self) -> bool {
        match self.slot.read() {
            Ok(Some(name)) => self.login(&name),
            Ok(None) => false,
            Err(e) => {
                warn!(error = %e, "Failed to read persisted session");
                false
            }
        }
    }

    /// Whether the session may change the text of `todo`.
    #[must_use]
    pub fn can_edit(&self, todo: &Todo) -> bool {
        self.session.logged_in && self.session.display_name == todo.author
    }

    /// Whether the session may delete `todo`.
    #[must_use]
    pub fn can_delete(&self, todo: &Todo) -> bool {
        self.can_edit(todo)
    }

    /// Whether the session may flip the completion state of `todo`.
    ///
    /// Completion is not author-gated: any logged-in session may toggle.
    #[must_use]
    pub fn can_toggle(&self, _todo: &Todo) -> bool {
        self.session.logged_in
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
