//! # Swap Market Core
//!
//! Core traits and types for the swap market's state architecture.
//!
//! This crate provides the abstractions every feature is built from: a pure
//! reducer over owned state, effect descriptions, and injected dependencies.
//!
//! ## Core Concepts
//!
//! - **State**: Domain state for a feature, owned and `Clone`-able
//! - **Action**: The closed set of inputs a reducer accepts
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Follow-up work described as a value, executed by the runtime
//! - **Environment**: Injected dependencies (clock, id generation)
//!
//! ## Example
//!
//! ```
//! use swapmarket_core::{effect::Effect, reducer::Reducer, SmallVec};
//!
//! #[derive(Clone, Debug, Default)]
//! struct CounterState {
//!     count: i64,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum CounterAction {
//!     Increment,
//! }
//!
//! struct CounterReducer;
//!
//! impl Reducer for CounterReducer {
//!     type State = CounterState;
//!     type Action = CounterAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut CounterState,
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
//! let mut state = CounterState::default();
//! let effects = CounterReducer.reduce(&mut state, CounterAction::Increment, &());
//! assert_eq!(state.count, 1);
//! assert!(effects.is_empty());
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use smallvec::{smallvec, SmallVec};

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They contain all business logic and are deterministic and testable.
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
        /// This is a pure function that:
        /// 1. Reads the action
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed
        ///
        /// Implementations must leave `state` untouched when an action does
        /// not apply; there is no partial mutation.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects are values returned from reducers. They are executed by the
/// Store after the reducer has finished, never from inside it.
pub mod effect {
    /// Effect type - describes follow-up work for the runtime
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    #[derive(Debug, Clone, PartialEq)]
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Feed an action back into the reducer once the current one completes
        Send(Box<Action>),

        /// Run effects in order
        Sequential(Vec<Effect<Action>>),
    }

    impl<Action> Effect<Action> {
        /// Feed `action` back into the store
        #[must_use]
        pub fn send(action: Action) -> Self {
            Effect::Send(Box::new(action))
        }

        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Returns `true` if this effect does nothing when executed
        #[must_use]
        pub fn is_none(&self) -> bool {
            match self {
                Effect::None => true,
                Effect::Send(_) => false,
                Effect::Sequential(effects) => effects.iter().all(Effect::is_none),
            }
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All sources of non-determinism (time, identity) are abstracted behind
/// traits and injected via the Environment parameter, so reducers stay pure
/// and tests stay reproducible.
pub mod environment {
    use chrono::{DateTime, Utc};
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Clock trait - abstracts time operations for testability
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    /// Source of numeric identities for newly created records
    ///
    /// Implementations must return strictly increasing values for the
    /// lifetime of the generator.
    pub trait IdGenerator: Send + Sync {
        /// Issue the next identity
        fn next_id(&self) -> u64;
    }

    /// Timestamp-derived identities that never repeat
    ///
    /// Issues the current Unix time in milliseconds, or one past the last
    /// issued value when several ids are requested within the same
    /// millisecond (or the wall clock steps backwards).
    #[derive(Debug, Default)]
    pub struct MonotonicIdGenerator {
        last: AtomicU64,
    }

    impl MonotonicIdGenerator {
        /// Creates a generator with no ids issued yet
        #[must_use]
        pub const fn new() -> Self {
            Self {
                last: AtomicU64::new(0),
            }
        }

        fn next_from(&self, now_millis: u64) -> u64 {
            let mut last = self.last.load(Ordering::Relaxed);
            loop {
                let candidate = now_millis.max(last.saturating_add(1));
                match self.last.compare_exchange_weak(
                    last,
                    candidate,
                    Ordering::AcqRel,
                    Ordering::Relaxed,
                ) {
                    Ok(_) => return candidate,
                    Err(current) => last = current,
                }
            }
        }
    }

    impl IdGenerator for MonotonicIdGenerator {
        fn next_id(&self) -> u64 {
            let now_millis = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
            self.next_from(now_millis)
        }
    }

}
