//! # Reducer Testing
//!
//! Testing utilities and helpers for the reducer architecture.
//!
//! This crate provides:
//! - Deterministic implementations of Environment traits
//! - [`ReducerTest`], a Given-When-Then builder for reducers
//! - Assertion helpers for effects
//!
//! ## Example
//!
//! ```ignore
//! use reducer_testing::{ReducerTest, test_clock};
//!
//! ReducerTest::new(TodoReducer::new())
//!     .with_env(TodoEnvironment::new(Arc::new(test_clock())))
//!     .given_state(TodoState::new())
//!     .when_action(TodoAction::Submit)
//!     .then_state(|state| assert_eq!(state.count(), 1))
//!     .run();
//! ```

use chrono::{DateTime, Utc};
use reducer_core::environment::Clock;


pub use reducer_test::{ReducerTest, assertions};

/// Deterministic implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use std::sync::Mutex;

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use reducer_testing::mocks::FixedClock;
    /// use reducer_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Clock that advances by a fixed step on every read
    ///
    /// The first read returns the start time.
    #[derive(Debug)]
    pub struct SteppingClock {
        next: Mutex<DateTime<Utc>>,
        step: chrono::Duration,
    }

    impl SteppingClock {
        /// Create a clock starting at `start` and advancing by `step` per read
        #[must_use]
        pub const fn new(start: DateTime<Utc>, step: chrono::Duration) -> Self {
            Self {
                next: Mutex::new(start),
                step,
            }
        }
    }

    impl Clock for SteppingClock {
        fn now(&self) -> DateTime<Utc> {
            let mut next = match self.next.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            let now = *next;
            *next = now + self.step;
            now
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(test_epoch())
    }

    /// 2025-01-01 00:00:00 UTC, the instant every test clock starts from
    #[must_use]
    pub fn test_epoch() -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(1_735_689_600, 0).unwrap_or_default()
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, SteppingClock, test_clock, test_epoch};
