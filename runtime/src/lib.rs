//! # Reducer Runtime
//!
//! Synchronous runtime for the reducer architecture.
//!
//! This crate provides the [`Store`], which owns state, runs the reducer for
//! each action and drains the effects it returns.
//!
//! ## Core Components
//!
//! - **Store**: Owns state, reducer and environment
//! - **Effect draining**: `Effect::Send` actions are queued and reduced within the same `send`
//! - **Observers**: Callbacks notified after every reduced action
//!
//! ## Example
//!
//! ```ignore
//! use reducer_runtime::Store;
//!
//! let mut store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action
//! store.send(Action::DoSomething)?;
//!
//! // Read state
//! let value = store.state(|s| s.some_field);
//! ```

use reducer_core::{effect::Effect, reducer::Reducer};

/// Store metrics via the `metrics` facade
pub mod metrics;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// A single `send` reduced more actions than the configured limit
        ///
        /// Actions reduced before the limit was hit stay applied; the
        /// remaining queued feedback actions are dropped.
        #[error("Feedback limit exceeded: more than {limit} actions in one send")]
        FeedbackLimitExceeded {
            /// The configured limit
            limit: usize,
        },
    }
}

pub use error::StoreError;

/// Default bound on actions reduced per `send`
pub const DEFAULT_MAX_FEEDBACK_ACTIONS: usize = 1024;

/// Configuration for Store instances
///
/// # Example
///
/// ```
/// use reducer_runtime::StoreConfig;
///
/// let config = StoreConfig::default().with_max_feedback_actions(64);
/// assert_eq!(config.max_feedback_actions, 64);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    /// Maximum number of actions reduced by one `send`, the initial action included
    pub max_feedback_actions: usize,
}

impl StoreConfig {
    /// Create a new configuration
    ///
    /// A limit of zero would reject every action and is raised to one.
    #[must_use]
    pub fn new(max_feedback_actions: usize) -> Self {
        Self {
            max_feedback_actions: max_feedback_actions.max(1),
        }
    }

    /// Set the feedback action limit
    #[must_use]
    pub fn with_max_feedback_actions(mut self, limit: usize) -> Self {
        self.max_feedback_actions = limit.max(1);
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_feedback_actions: DEFAULT_MAX_FEEDBACK_ACTIONS,
        }
    }
}

/// The Store and its observer type
pub mod store {
    use super::metrics::StoreMetrics;
    use super::{Effect, Reducer, StoreConfig, StoreError};
    use std::collections::VecDeque;
    use std::time::Instant;

    /// Callback invoked after each reduced action with the action and the new state
    pub type Observer<S, A> = Box<dyn FnMut(&A, &S)>;

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (owned, mutated only through the reducer)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Effect draining (feedback loop, bounded by [`StoreConfig`])
    ///
    /// Everything runs on the caller's thread. `send` takes `&mut self`, so
    /// two actions can never be reduced concurrently.
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: S,
        reducer: R,
        environment: E,
        config: StoreConfig,
        observers: Vec<Observer<S, A>>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
        A: Clone + std::fmt::Debug,
    {
        /// Create a new store with initial state, reducer, and environment
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_config(initial_state, reducer, environment, StoreConfig::default())
        }

        /// Create a new Store with custom configuration
        #[must_use]
        pub fn with_config(
            initial_state: S,
            reducer: R,
            environment: E,
            config: StoreConfig,
        ) -> Self {
            Self {
                state: initial_state,
                reducer,
                environment,
                config,
                observers: Vec::new(),
            }
        }

        /// The configuration this store runs with
        #[must_use]
        pub const fn config(&self) -> &StoreConfig {
            &self.config
        }

        /// The injected environment
        #[must_use]
        pub const fn environment(&self) -> &E {
            &self.environment
        }

        /// Register an observer called after every reduced action
        ///
        /// Observers run in registration order, after the reducer returns and
        /// before any fed-back action is reduced.
        pub fn subscribe<F>(&mut self, observer: F)
        where
            F: FnMut(&A, &S) + 'static,
        {
            self.observers.push(Box::new(observer));
        }

        /// Send an action to the store
        ///
        /// Reduces the action, then every action fed back through
        /// [`Effect::Send`], in FIFO order, until the queue is empty.
        ///
        /// # Returns
        ///
        /// The number of actions reduced, the initial one included
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::FeedbackLimitExceeded`] if the feedback loop
        /// would reduce more than `max_feedback_actions` actions.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub fn send(&mut self, action: A) -> Result<usize, StoreError> {
            let limit = self.config.max_feedback_actions;
            let mut queue = VecDeque::from([action]);
            let mut reduced = 0usize;

            while let Some(action) = queue.pop_front() {
                if reduced >= limit {
                    tracing::warn!(
                        limit,
                        dropped = queue.len() + 1,
                        "Feedback limit exceeded, dropping queued actions"
                    );
                    StoreMetrics::record_feedback_limit();
                    return Err(StoreError::FeedbackLimitExceeded { limit });
                }

                tracing::debug!(?action, "Processing action");
                let observed = (!self.observers.is_empty()).then(|| action.clone());

                let effects = {
                    let span = tracing::debug_span!("reducer_execution");
                    let _enter = span.enter();

                    let start = Instant::now();
                    let effects = self.reducer.reduce(&mut self.state, action, &self.environment);
                    let live = effects.iter().filter(|e| !e.is_none()).count();
                    StoreMetrics::record_reduce(start.elapsed(), live);

                    tracing::trace!("Reducer completed, returned {} effects", effects.len());
                    effects
                };
                reduced += 1;

                if let Some(action) = observed {
                    for observer in &mut self.observers {
                        observer(&action, &self.state);
                    }
                }

                for effect in effects {
                    Self::enqueue(effect, &mut queue);
                }
            }

            tracing::trace!(reduced, "Action processing completed");
            Ok(reduced)
        }

        fn enqueue(effect: Effect<A>, queue: &mut VecDeque<A>) {
            match effect {
                Effect::None => {
                    tracing::trace!("Executing Effect::None (no-op)");
                },
                Effect::Send(_) | Effect::Sequential(_) => {
                    let actions = effect.into_actions();
                    tracing::trace!("Queueing {} fed-back actions", actions.len());
                    queue.extend(actions);
                },
            }
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let count = store.state(|s| s.todos.len());
        /// ```
        pub fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            f(&self.state)
        }

        /// Consume the store and return its state
        #[must_use]
        pub fn into_state(self) -> S {
            self.state
        }
    }

    impl<S, A, E, R> std::fmt::Debug for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
        S: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("Store")
                .field("state", &self.state)
                .field("config", &self.config)
                .field("observers", &self.observers.len())
                .finish_non_exhaustive()
        }
    }
}

pub use store::{Observer, Store};

#[cfg(test)]
mod tests {
    use super::*;
    use reducer_core::{smallvec, SmallVec};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, Default)]
    struct TestState {
        value: i32,
        log: Vec<&'static str>,
    }

    #[derive(Debug, Clone)]
    enum TestAction {
        Increment,
        Decrement,
        NoOp,
        FeedBack,
        FeedBackSequence,
        Loop,
    }

    #[derive(Debug, Clone)]
    struct TestReducer;

    impl Reducer for TestReducer {
        type State = TestState;
        type Action = TestAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                TestAction::Increment => {
                    state.value += 1;
                    state.log.push("inc");
                    smallvec![Effect::None]
                },
                TestAction::Decrement => {
                    state.value -= 1;
                    state.log.push("dec");
                    SmallVec::new()
                },
                TestAction::NoOp => SmallVec::new(),
                TestAction::FeedBack => smallvec![Effect::send(TestAction::Increment)],
                TestAction::FeedBackSequence => smallvec![
                    Effect::chain(vec![
                        Effect::send(TestAction::Increment),
                        Effect::send(TestAction::Increment),
                    ]),
                    Effect::send(TestAction::Decrement),
                ],
                TestAction::Loop => smallvec![Effect::send(TestAction::Loop)],
            }
        }
    }

    #[test]
    fn test_store_creation() {
        let store = Store::new(TestState::default(), TestReducer, ());
        assert_eq!(store.state(|s| s.value), 0);
        assert_eq!(store.config().max_feedback_actions, DEFAULT_MAX_FEEDBACK_ACTIONS);
    }

    #[test]
    fn test_send_reduces_action() {
        let mut store = Store::new(TestState::default(), TestReducer, ());
        assert_eq!(store.send(TestAction::Increment), Ok(1));
        assert_eq!(store.send(TestAction::Increment), Ok(1));
        assert_eq!(store.send(TestAction::Decrement), Ok(1));
        assert_eq!(store.state(|s| s.value), 1);
    }

    #[test]
    fn test_noop_leaves_state() {
        let mut store = Store::new(TestState::default(), TestReducer, ());
        assert_eq!(store.send(TestAction::NoOp), Ok(1));
        assert_eq!(store.state(|s| s.value), 0);
    }

    #[test]
    fn test_feedback_action_is_reduced_in_same_send() {
        let mut store = Store::new(TestState::default(), TestReducer, ());
        assert_eq!(store.send(TestAction::FeedBack), Ok(2));
        assert_eq!(store.state(|s| s.value), 1);
    }

    #[test]
    fn test_sequential_effects_keep_order() {
        let mut store = Store::new(TestState::default(), TestReducer, ());
        assert_eq!(store.send(TestAction::FeedBackSequence), Ok(4));
        assert_eq!(store.state(|s| s.log.clone()), vec!["inc", "inc", "dec"]);
        assert_eq!(store.state(|s| s.value), 1);
    }

    #[test]
    fn test_feedback_limit_stops_cycles() {
        let config = StoreConfig::default().with_max_feedback_actions(8);
        let mut store = Store::with_config(TestState::default(), TestReducer, (), config);

        assert_eq!(
            store.send(TestAction::Loop),
            Err(StoreError::FeedbackLimitExceeded { limit: 8 })
        );

        // The store stays usable afterwards
        assert_eq!(store.send(TestAction::Increment), Ok(1));
        assert_eq!(store.state(|s| s.value), 1);
    }

    #[test]
    fn test_zero_limit_is_raised_to_one() {
        assert_eq!(StoreConfig::new(0).max_feedback_actions, 1);
        assert_eq!(
            StoreConfig::default().with_max_feedback_actions(0).max_feedback_actions,
            1
        );

        let mut store =
            Store::with_config(TestState::default(), TestReducer, (), StoreConfig::new(0));
        assert_eq!(store.send(TestAction::Increment), Ok(1));
        assert!(store.send(TestAction::FeedBack).is_err());
    }

    #[test]
    fn test_observers_see_every_reduced_action() {
        let seen: Rc<RefCell<Vec<(String, i32)>>> = Rc::default();
        let mut store = Store::new(TestState::default(), TestReducer, ());

        let sink = Rc::clone(&seen);
        store.subscribe(move |action, state| {
            sink.borrow_mut().push((format!("{action:?}"), state.value));
        });

        let _ = store.send(TestAction::FeedBack);

        assert_eq!(
            *seen.borrow(),
            vec![("FeedBack".to_string(), 0), ("Increment".to_string(), 1)]
        );
    }

    #[test]
    fn test_into_state() {
        let mut store = Store::new(TestState::default(), TestReducer, ());
        let _ = store.send(TestAction::Increment);
        assert_eq!(store.into_state().value, 1);
    }
}
