//! Todo item types shared by the store, the backends, and the TUI.
//!
//! All types serialize to the JSON shape used by the remote collection
//! resource: `{ "id", "text", "completed", "author" }`.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// A todo item as held by the remote collection.
///
/// `id` is assigned by the backend and treated as opaque. `author` is set once
/// when the item is created and no update type can carry a new value for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Server-assigned identifier.
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,

    /// Display text.
    pub text: String,

    /// Completion state.
    pub completed: bool,

    /// Display name of the session that created the item.
    pub author: String,
}

/// Body sent to the collection resource to create an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTodo {
    pub text: String,
    pub completed: bool,
    pub author: String,
}

impl NewTodo {
    /// Creates a draft that starts out not completed.
    #[must_use]
    pub fn new(text: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            completed: false,
            author: author.into(),
        }
    }

    /// Materializes the draft into a stored item with the given identifier.
    #[must_use]
    pub fn into_todo(self, id: String) -> Todo {
        Todo {
            id,
            text: self.text,
            completed: self.completed,
            author: self.author,
        }
    }
}

/// Partial update for an existing item.
///
/// Fields left as `None` are omitted from the request body so the backend
/// keeps their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TodoPatch {
    /// Patch that only replaces the text.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            completed: None,
        }
    }

    /// Patch that only sets the completion state.
    #[must_use]
    pub fn completed(completed: bool) -> Self {
        Self {
            text: None,
            completed: Some(completed),
        }
    }

    /// Returns `true` if the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.completed.is_none()
    }

    /// Applies the patch to an item, leaving `id` and `author` untouched.
    pub fn apply_to(&self, todo: &mut Todo) {
        if let Some(text) = &self.text {
            todo.text = text.clone();
        }
        if let Some(completed) = self.completed {
            todo.completed = completed;
        }
    }
}

/// Accepts an identifier encoded either as a JSON string or a JSON number.
///
/// Some hosted mock stores return numeric ids; they are kept as their decimal
/// string so the rest of the crate only deals with opaque strings.
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct IdVisitor;

    impl Visitor<'_> for IdVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a string or integer identifier")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }
    }

    deserializer.deserialize_any(IdVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn todo_deserializes_string_id() {
        let todo: Todo = serde_json::from_value(json!({
            "id": "7",
            "text": "Buy milk",
            "completed": false,
            "author": "Alice"
        }))
        .unwrap();

        assert_eq!(todo.id, "7");
        assert_eq!(todo.text, "Buy milk");
        assert!(!todo.completed);
        assert_eq!(todo.author, "Alice");
    }

    #[test]
    fn todo_deserializes_numeric_id() {
        let todo: Todo = serde_json::from_value(json!({
            "id": 1712345678901u64,
            "text": "Buy milk",
            "completed": true,
            "author": "Alice"
        }))
        .unwrap();

        assert_eq!(todo.id, "1712345678901");
        assert!(todo.completed);
    }

    #[test]
    fn todo_ignores_unknown_fields() {
        let todo: Todo = serde_json::from_value(json!({
            "createdAt": "2024-01-01T00:00:00.000Z",
            "id": "1",
            "text": "Walk the dog",
            "completed": false,
            "author": "Bob"
        }))
        .unwrap();

        assert_eq!(todo.id, "1");
    }

    #[test]
    fn todo_rejects_boolean_id() {
        let result = serde_json::from_value::<Todo>(json!({
            "id": true,
            "text": "x",
            "completed": false,
            "author": "a"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn new_todo_starts_incomplete() {
        let draft = NewTodo::new("Buy milk", "Alice");
        assert_eq!(
            serde_json::to_value(&draft).unwrap(),
            json!({ "text": "Buy milk", "completed": false, "author": "Alice" })
        );
    }

    #[test]
    fn patch_omits_absent_fields() {
        assert_eq!(
            serde_json::to_value(TodoPatch::completed(true)).unwrap(),
            json!({ "completed": true })
        );
        assert_eq!(
            serde_json::to_value(TodoPatch::text("Buy oat milk")).unwrap(),
            json!({ "text": "Buy oat milk" })
        );
        assert_eq!(
            serde_json::to_value(TodoPatch::default()).unwrap(),
            json!({})
        );
    }

    #[test]
    fn patch_apply_keeps_author_and_id() {
        let mut todo = NewTodo::new("Buy milk", "Alice").into_todo("1".to_string());
        let patch = TodoPatch {
            text: Some("Buy bread".to_string()),
            completed: Some(true),
        };

        patch.apply_to(&mut todo);

        assert_eq!(todo.id, "1");
        assert_eq!(todo.author, "Alice");
        assert_eq!(todo.text, "Buy bread");
        assert!(todo.completed);
    }

    #[test]
    fn patch_is_empty() {
        assert!(TodoPatch::default().is_empty());
        assert!(!TodoPatch::completed(false).is_empty());
    }
}
