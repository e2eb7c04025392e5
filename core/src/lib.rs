//! # Reducer Core
//!
//! Core traits and types for reducer-driven, in-memory application state.
//!
//! ## Core Concepts
//!
//! - **State**: Domain state for a feature, owned and `Clone`
//! - **Action**: Every input a reducer accepts (commands and the events they produce)
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Description of follow-up work, executed by the runtime
//! - **Environment**: Injected dependencies (clock) so reducers stay deterministic
//!
//! Everything here is synchronous. The runtime drains effects on the caller's
//! thread; there is no executor and no suspension point.
//!
//! ## Example
//!
//! ```
//! use reducer_core::{effect::Effect, reducer::Reducer, SmallVec};
//!
//! #[derive(Clone, Debug, Default)]
//! struct Counter {
//!     count: i64,
//! }
//!
//! enum CounterAction {
//!     Increment,
//! }
//!
//! struct CounterReducer;
//!
//! impl Reducer for CounterReducer {
//!     type State = Counter;
//!     type Action = CounterAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut Counter,
//!         action: CounterAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<CounterAction>; 4]> {
//!         match action {
//!             CounterAction::Increment => state.count += 1,
//!         }
//!         SmallVec::new()
//!     }
//! }
//!
//! let mut state = Counter::default();
//! let effects = CounterReducer.reduce(&mut state, CounterAction::Increment, &());
//! assert_eq!(state.count, 1);
//! assert!(effects.is_empty());
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use smallvec::{smallvec, SmallVec};

/// Reducer module - the core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`.
/// They hold all business logic and are deterministic given the environment.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// Implementations:
        /// 1. Interpret the action against current state
        /// 2. Update state in place
        /// 3. Return effect descriptions for the runtime
        ///
        /// Most reducers return an empty vector; four inline slots avoid
        /// allocation for the common small cases.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - descriptions of follow-up work
///
/// Effects are values returned by reducers. The runtime interprets them after
/// the reducer returns; a reducer never performs them itself.
pub mod effect {
    /// Effect type - describes follow-up work for the runtime
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type effects can feed back into the reducer
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Feed an action back into the same reducer
        ///
        /// Fed-back actions are queued and reduced after the current action,
        /// within the same `send` call.
        Send(Box<Action>),

        /// Run effects one after another, in order
        Sequential(Vec<Effect<Action>>),
    }

    impl<Action> Effect<Action> {
        /// Wrap an action as a feedback effect
        #[must_use]
        pub fn send(action: Action) -> Self {
            Self::Send(Box::new(action))
        }

        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Self>) -> Self {
            Self::Sequential(effects)
        }

        /// Returns true if executing this effect does nothing
        #[must_use]
        pub fn is_none(&self) -> bool {
            match self {
                Self::None => true,
                Self::Send(_) => false,
                Self::Sequential(effects) => effects.iter().all(Self::is_none),
            }
        }

        /// Flatten into the actions this effect feeds back, in execution order
        #[must_use]
        pub fn into_actions(self) -> Vec<Action> {
            let mut actions = Vec::new();
            self.collect_actions(&mut actions);
            actions
        }

        fn collect_actions(self, out: &mut Vec<Action>) {
            match self {
                Self::None => {},
                Self::Send(action) => out.push(*action),
                Self::Sequential(effects) => {
                    for effect in effects {
                        effect.collect_actions(out);
                    }
                },
            }
        }
    }
}

/// Environment module - dependency injection traits
///
/// External dependencies are abstracted behind traits and injected via the
/// reducer's Environment parameter.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time for testability
    ///
    /// Production code uses [`SystemClock`]; tests use a fixed clock so that
    /// timestamps and anything derived from them are reproducible.
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Wall-clock time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
        fn now(&self) -> DateTime<Utc> {
            (**self).now()
        }
    }
}
