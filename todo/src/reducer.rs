//! Reducer logic for the todo list.
//!
//! Every command maps to exactly one event, which is then applied to state.
//! No command can fail: unknown ids, empty text and an empty list are all
//! accepted, and none of them produce effects.

use crate::types::{TodoAction, TodoId, TodoState};
use reducer_core::{
    effect::Effect,
    environment::{Clock, SystemClock},
    reducer::Reducer,
    SmallVec,
};
use std::sync::Arc;

/// Environment dependencies for the todo reducer
#[derive(Clone)]
pub struct TodoEnvironment {
    /// Clock for creation timestamps and ids
    pub clock: Arc<dyn Clock>,
}

impl TodoEnvironment {
    /// Creates a new `TodoEnvironment`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Environment backed by the wall clock
    #[must_use]
    pub fn system() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl std::fmt::Debug for TodoEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoEnvironment").finish_non_exhaustive()
    }
}

/// Reducer for the todo list
#[derive(Clone, Copy, Debug, Default)]
pub struct TodoReducer;

impl TodoReducer {
    /// Creates a new `TodoReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Turns a command into the event it produces
    ///
    /// Events map to themselves.
    fn decide(state: &TodoState, action: TodoAction, env: &TodoEnvironment) -> TodoAction {
        match action {
            TodoAction::SetInputText { text } => TodoAction::InputChanged { text },
            TodoAction::Submit => {
                let created_at = env.clock.now();
                TodoAction::TodoAdded {
                    id: TodoId::next(created_at, state.last_id()),
                    value: state.input_text.clone(),
                    created_at,
                }
            },
            TodoAction::EditTodo { id, value } => TodoAction::TodoEdited { id, value },
            // The caller's value wins over what is stored
            TodoAction::ToggleDone { id, current } => TodoAction::DoneSet { id, done: !current },
            TodoAction::ToggleRemoved { id, current } => TodoAction::VisibilitySet {
                id,
                visible: !current,
            },
            event @ (TodoAction::InputChanged { .. }
            | TodoAction::TodoAdded { .. }
            | TodoAction::TodoEdited { .. }
            | TodoAction::DoneSet { .. }
            | TodoAction::VisibilitySet { .. }) => event,
        }
    }

    fn log_event(state: &TodoState, event: &TodoAction) {
        match event {
            TodoAction::TodoAdded { id, .. } => {
                tracing::debug!(%id, count = state.count() + 1, "Todo added");
            },
            TodoAction::TodoEdited { id, .. } => {
                tracing::trace!(todos = ?state.todos(), "Todos before edit");
                tracing::debug!(%id, matched = state.get(*id).is_some(), "Todo edited");
            },
            TodoAction::DoneSet { id, done } => {
                tracing::debug!(%id, done, matched = state.get(*id).is_some(), "Done flag set");
            },
            TodoAction::VisibilitySet { id, visible } => {
                tracing::debug!(
                    %id,
                    visible,
                    matched = state.get(*id).is_some(),
                    "Visible flag set"
                );
            },
            _ => {},
        }
    }
}

impl Reducer for TodoReducer {
    type State = TodoState;
    type Action = TodoAction;
    type Environment = TodoEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let event = Self::decide(state, action, env);
        Self::log_event(state, &event);
        state.apply(&event);
        SmallVec::new()
    }
}
