//! Domain types for the todo list.
//!
//! A todo list is an input buffer plus an ordered collection of todo items,
//! newest first. Items are never deleted; removing one clears its `visible`
//! flag and it drops out of [`TodoState::visible_todos`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Unique identifier for a todo item
///
/// Ids are creation timestamps in milliseconds, bumped when needed so that
/// every id is strictly greater than the one before it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TodoId(u64);

impl TodoId {
    /// Creates a `TodoId` from a raw value
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw value
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Id for an item created at `now`, given the last id handed out
    ///
    /// Uses the timestamp in milliseconds unless that would not exceed
    /// `last`, in which case it is `last + 1`. Timestamps before the Unix
    /// epoch count as zero.
    #[must_use]
    pub fn next(now: DateTime<Utc>, last: Option<Self>) -> Self {
        let millis = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        match last {
            Some(Self(last)) if millis <= last => Self(last.saturating_add(1)),
            _ => Self(millis),
        }
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single todo item
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Unique identifier, fixed at creation
    pub id: TodoId,
    /// Text of the todo
    pub value: String,
    /// Whether the todo is checked off
    pub done: bool,
    /// Whether the todo shows up in the visible list; cleared by "remove"
    pub visible: bool,
    /// When the todo was created
    pub created_at: DateTime<Utc>,
}

impl Todo {
    /// Creates a new, unchecked, visible todo
    #[must_use]
    pub const fn new(id: TodoId, value: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            value,
            done: false,
            visible: true,
            created_at,
        }
    }
}

/// State of the todo list
///
/// The collection is an `Arc<[Todo]>` that is replaced wholesale on every
/// mutation. A snapshot taken with [`TodoState::todos`] is never modified
/// afterwards.
///
/// Ids strictly decrease from front to back and never exceed `last_id`.
/// Deserialization rejects states that break this.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTodoState")]
pub struct TodoState {
    /// Pending text of the input field
    pub input_text: String,
    todos: Arc<[Todo]>,
    last_id: Option<TodoId>,
}

impl TodoState {
    /// Creates an empty todo state
    #[must_use]
    pub fn new() -> Self {
        Self {
            input_text: String::new(),
            todos: Arc::from(Vec::new()),
            last_id: None,
        }
    }

    /// Rebuilds a state by applying events in order
    ///
    /// Commands in the sequence are ignored.
    #[must_use]
    pub fn replay<'a, I>(events: I) -> Self
    where
        I: IntoIterator<Item = &'a TodoAction>,
    {
        let mut state = Self::new();
        for event in events {
            state.apply(event);
        }
        state
    }

    /// Snapshot of the whole collection, newest first
    #[must_use]
    pub fn todos(&self) -> Arc<[Todo]> {
        Arc::clone(&self.todos)
    }

    /// The todos whose `visible` flag is set, in collection order
    ///
    /// Recomputed on every call.
    #[must_use]
    pub fn visible_todos(&self) -> Vec<Todo> {
        self.todos.iter().filter(|t| t.visible).cloned().collect()
    }

    /// Returns the number of todos, removed ones included
    #[must_use]
    pub fn count(&self) -> usize {
        self.todos.len()
    }

    /// Returns the number of visible todos
    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.todos.iter().filter(|t| t.visible).count()
    }

    /// Returns the number of checked-off todos
    #[must_use]
    pub fn done_count(&self) -> usize {
        self.todos.iter().filter(|t| t.done).count()
    }

    /// Returns a todo by ID
    #[must_use]
    pub fn get(&self, id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == id)
    }

    /// The most recently assigned id
    #[must_use]
    pub const fn last_id(&self) -> Option<TodoId> {
        self.last_id
    }

    /// Applies an event to state. Commands are ignored.
    pub(crate) fn apply(&mut self, action: &TodoAction) {
        match action {
            TodoAction::InputChanged { text } => {
                self.input_text.clone_from(text);
            },
            TodoAction::TodoAdded {
                id,
                value,
                created_at,
            } => {
                if let Some(last) = self.last_id.filter(|last| id <= last) {
                    tracing::warn!(%id, %last, "Ignoring added todo that is not newer than the last one");
                    return;
                }
                let todo = Todo::new(*id, value.clone(), *created_at);
                self.todos = std::iter::once(todo)
                    .chain(self.todos.iter().cloned())
                    .collect();
                self.last_id = Some(*id);
                self.input_text.clear();
            },
            TodoAction::TodoEdited { id, value } => {
                self.rewrite(*id, |todo| todo.value.clone_from(value));
            },
            TodoAction::DoneSet { id, done } => {
                self.rewrite(*id, |todo| todo.done = *done);
            },
            TodoAction::VisibilitySet { id, visible } => {
                self.rewrite(*id, |todo| todo.visible = *visible);
            },
            TodoAction::SetInputText { .. }
            | TodoAction::Submit
            | TodoAction::EditTodo { .. }
            | TodoAction::ToggleDone { .. }
            | TodoAction::ToggleRemoved { .. } => {},
        }
    }

    /// Replaces the collection with a copy where the matching todo is updated
    ///
    /// The copy is built even when no todo matches.
    fn rewrite<F>(&mut self, id: TodoId, update: F)
    where
        F: Fn(&mut Todo),
    {
        self.todos = self
            .todos
            .iter()
            .map(|todo| {
                let mut todo = todo.clone();
                if todo.id == id {
                    update(&mut todo);
                }
                todo
            })
            .collect();
    }
}

impl Default for TodoState {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialized form of [`TodoState`], checked before it becomes one
#[derive(Deserialize)]
struct RawTodoState {
    input_text: String,
    todos: Arc<[Todo]>,
    last_id: Option<TodoId>,
}

/// Errors for a deserialized state whose ids are inconsistent
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// A todo is not older than the one in front of it
    #[error("todo {id} is not older than the todo before it")]
    OutOfOrder {
        /// Offending todo
        id: TodoId,
    },

    /// `last_id` is missing or below the newest todo
    #[error("last id {last:?} is below todo {id}")]
    StaleLastId {
        /// Newest todo in the collection
        id: TodoId,
        /// Recorded last id
        last: Option<TodoId>,
    },
}

impl TryFrom<RawTodoState> for TodoState {
    type Error = StateError;

    fn try_from(raw: RawTodoState) -> Result<Self, Self::Error> {
        if let Some(pair) = raw.todos.windows(2).find(|pair| pair[0].id <= pair[1].id) {
            return Err(StateError::OutOfOrder { id: pair[1].id });
        }
        if let Some(newest) = raw.todos.first() {
            if raw.last_id.is_none_or(|last| last < newest.id) {
                return Err(StateError::StaleLastId {
                    id: newest.id,
                    last: raw.last_id,
                });
            }
        }
        Ok(Self {
            input_text: raw.input_text,
            todos: raw.todos,
            last_id: raw.last_id,
        })
    }
}

/// Actions representing commands and events for the todo list
///
/// Commands are what the user interface sends. The reducer turns each into
/// exactly one event and applies it. Events can also be sent directly to
/// replay history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TodoAction {
    // ========== Commands ==========
    /// Command: Replace the pending input text
    SetInputText {
        /// New content of the input field
        text: String,
    },

    /// Command: Add the pending input text as a new todo and clear the input
    Submit,

    /// Command: Replace the text of a todo
    EditTodo {
        /// Todo to edit
        id: TodoId,
        /// New text
        value: String,
    },

    /// Command: Flip the done flag
    ///
    /// `current` is the value the caller last saw; the todo ends up with
    /// `done = !current` whatever it stores right now.
    ToggleDone {
        /// Todo to toggle
        id: TodoId,
        /// Done flag as last rendered
        current: bool,
    },

    /// Command: Flip the visible flag (the "remove" button)
    ///
    /// Same contract as [`TodoAction::ToggleDone`]: the todo ends up with
    /// `visible = !current`.
    ToggleRemoved {
        /// Todo to toggle
        id: TodoId,
        /// Visible flag as last rendered
        current: bool,
    },

    // ========== Events ==========
    /// Event: Input text was replaced
    InputChanged {
        /// New content of the input field
        text: String,
    },

    /// Event: A todo was added at the front, consuming the input text
    TodoAdded {
        /// Todo identifier
        id: TodoId,
        /// Text of the todo
        value: String,
        /// When the todo was created
        created_at: DateTime<Utc>,
    },

    /// Event: A todo's text was replaced
    TodoEdited {
        /// Todo identifier
        id: TodoId,
        /// New text
        value: String,
    },

    /// Event: A todo's done flag was set
    DoneSet {
        /// Todo identifier
        id: TodoId,
        /// New done flag
        done: bool,
    },

    /// Event: A todo's visible flag was set
    VisibilitySet {
        /// Todo identifier
        id: TodoId,
        /// New visible flag
        visible: bool,
    },
}

impl TodoAction {
    /// Returns true if this action is a command
    #[must_use]
    pub const fn is_command(&self) -> bool {
        matches!(
            self,
            Self::SetInputText { .. }
                | Self::Submit
                | Self::EditTodo { .. }
                | Self::ToggleDone { .. }
                | Self::ToggleRemoved { .. }
        )
    }

    /// Returns true if this action is an event
    #[must_use]
    pub const fn is_event(&self) -> bool {
        !self.is_command()
    }

    /// Variant name, for logging
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SetInputText { .. } => "SetInputText",
            Self::Submit => "Submit",
            Self::EditTodo { .. } => "EditTodo",
            Self::ToggleDone { .. } => "ToggleDone",
            Self::ToggleRemoved { .. } => "ToggleRemoved",
            Self::InputChanged { .. } => "InputChanged",
            Self::TodoAdded { .. } => "TodoAdded",
            Self::TodoEdited { .. } => "TodoEdited",
            Self::DoneSet { .. } => "DoneSet",
            Self::VisibilitySet { .. } => "VisibilitySet",
        }
    }
}
