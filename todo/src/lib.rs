//! In-memory todo list built on the reducer architecture.
//!
//! The list is an input buffer plus an ordered collection of todos, newest
//! first. Every user interaction is a [`TodoAction`] sent to a [`TodoStore`]:
//!
//! - `SetInputText` replaces the input buffer
//! - `Submit` turns the buffer into a new todo and clears it
//! - `EditTodo` replaces a todo's text
//! - `ToggleDone` / `ToggleRemoved` flip a flag based on the caller's last
//!   seen value
//!
//! [`TodoState::visible_todos`] derives the list a user sees. Removed todos
//! stay in the collection with `visible == false`.
//!
//! # Quick Start
//!
//! ```
//! use todo::{TodoAction, TodoEnvironment, TodoState, new_store};
//! use reducer_runtime::StoreConfig;
//!
//! let mut store = new_store(TodoEnvironment::system(), StoreConfig::default());
//!
//! store.send(TodoAction::SetInputText { text: "buy milk".to_string() })?;
//! store.send(TodoAction::Submit)?;
//!
//! let visible = store.state(TodoState::visible_todos);
//! assert_eq!(visible.len(), 1);
//! assert_eq!(visible[0].value, "buy milk");
//! # Ok::<(), reducer_runtime::StoreError>(())
//! ```

pub mod config;
pub mod reducer;
pub mod types;
pub mod ui;

// Re-export commonly used types
pub use config::{Config, ConfigError};
pub use reducer::{TodoEnvironment, TodoReducer};
pub use types::{StateError, Todo, TodoAction, TodoId, TodoState};

use reducer_runtime::{Store, StoreConfig};

/// Store running the todo reducer
pub type TodoStore = Store<TodoState, TodoAction, TodoEnvironment, TodoReducer>;

/// Creates an empty todo store
#[must_use]
pub fn new_store(env: TodoEnvironment, config: StoreConfig) -> TodoStore {
    Store::with_config(TodoState::new(), TodoReducer::new(), env, config)
}
