//! # Swap Market Runtime
//!
//! Runtime implementation for the swap market's reducer architecture.
//!
//! This crate provides the Store runtime that owns state, runs the reducer
//! and drains the effects it returns.
//!
//! ## Core Components
//!
//! - **Store**: Owns the current state snapshot and applies actions to it
//! - **Effect Loop**: Feeds `Effect::Send` actions back into the reducer
//! - **Snapshots**: Every `send` yields an immutable `Arc` of the new state
//!
//! ## Example
//!
//! ```ignore
//! use swapmarket_runtime::Store;
//!
//! let mut store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action and keep the resulting snapshot
//! let snapshot = store.send(Action::DoSomething);
//!
//! // Read state
//! let value = store.state(|s| s.some_field);
//! ```

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;
use swapmarket_core::{effect::Effect, reducer::Reducer, SmallVec};

/// The Store runtime
pub mod store {
    use super::{Arc, Effect, Instant, Reducer, SmallVec, VecDeque};

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (as an `Arc` snapshot, copied on write)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Effect execution (with feedback loop)
    ///
    /// It is single-owner and synchronous: `send` runs the reducer and every
    /// action fed back through effects to completion before it returns, so
    /// no caller can observe an intermediate state.
    ///
    /// Snapshots handed out earlier are never modified. When one is still
    /// held by a consumer, the next action clones the state before reducing.
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<S>,
        reducer: R,
        environment: E,
        version: u64,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
        S: Clone,
    {
        /// Create a new store with initial state, reducer, and environment
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self {
                state: Arc::new(initial_state),
                reducer,
                environment,
                version: 0,
            }
        }

        /// Send an action to the store
        ///
        /// Runs the reducer for `action`, then for every action produced by
        /// the returned effects (in the order they were produced), and
        /// returns the resulting snapshot.
        #[tracing::instrument(skip_all, name = "store_send")]
        pub fn send(&mut self, action: A) -> Arc<S> {
            tracing::debug!("Processing action");

            let mut pending = VecDeque::from([action]);
            while let Some(action) = pending.pop_front() {
                let effects = self.reduce(action);

                tracing::trace!("Executing {} effects", effects.len());
                for effect in effects {
                    Self::execute_effect(effect, &mut pending);
                }
            }

            tracing::debug!(version = self.version, "Action processing completed");
            self.snapshot()
        }

        fn reduce(&mut self, action: A) -> SmallVec<[Effect<A>; 4]> {
            metrics::counter!("store.actions.total").increment(1);

            let span = tracing::debug_span!("reducer_execution");
            let _enter = span.enter();

            let state = Arc::make_mut(&mut self.state);

            let start = Instant::now();
            let effects = self.reducer.reduce(state, action, &self.environment);
            metrics::histogram!("store.reducer.duration_seconds")
                .record(start.elapsed().as_secs_f64());

            self.version += 1;
            tracing::trace!("Reducer completed, returned {} effects", effects.len());

            effects
        }

        fn execute_effect(effect: Effect<A>, pending: &mut VecDeque<A>) {
            match effect {
                Effect::None => {},
                Effect::Send(action) => {
                    metrics::counter!("store.effects.total", "type" => "send").increment(1);
                    pending.push_back(*action);
                },
                Effect::Sequential(effects) => {
                    for effect in effects {
                        Self::execute_effect(effect, pending);
                    }
                },
            }
        }

        /// The current state snapshot
        ///
        /// The returned `Arc` is immutable; later actions never change it.
        #[must_use]
        pub fn snapshot(&self) -> Arc<S> {
            Arc::clone(&self.state)
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let ticket_count = store.state(|s| s.tickets.len());
        /// ```
        pub fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            f(&self.state)
        }

        /// Number of actions reduced so far, including fed-back ones
        ///
        /// Strictly increases with every reduced action, so it can key a
        /// cache of views derived from the current snapshot.
        #[must_use]
        pub const fn version(&self) -> u64 {
            self.version
        }

        /// The injected environment
        #[must_use]
        pub const fn environment(&self) -> &E {
            &self.environment
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
                .field("version", &self.version)
                .finish_non_exhaustive()
        }
    }
}

pub use store::Store;

#[cfg(test)]
mod tests {
    use super::*;
    use swapmarket_core::smallvec;

    #[derive(Clone, Debug, Default, PartialEq)]
    struct TestState {
        value: i32,
    }

    #[derive(Clone, Debug)]
    enum TestAction {
        Increment,
        IncrementTwiceLater,
    }

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
                    SmallVec::new()
                },
                TestAction::IncrementTwiceLater => {
                    smallvec![Effect::chain(vec![
                        Effect::send(TestAction::Increment),
                        Effect::None,
                        Effect::send(TestAction::Increment),
                    ])]
                },
            }
        }
    }

    #[test]
    fn test_store_send_returns_new_snapshot() {
        let mut store = Store::new(TestState::default(), TestReducer, ());

        let snapshot = store.send(TestAction::Increment);
        assert_eq!(snapshot.value, 1);
        assert_eq!(store.state(|s| s.value), 1);
    }

    #[test]
    fn test_store_runs_fed_back_actions_before_returning() {
        let mut store = Store::new(TestState::default(), TestReducer, ());

        let snapshot = store.send(TestAction::IncrementTwiceLater);
        assert_eq!(snapshot.value, 2);
        assert_eq!(store.version(), 3);
    }

    #[test]
    fn test_held_snapshot_is_never_modified() {
        let mut store = Store::new(TestState::default(), TestReducer, ());

        let before = store.send(TestAction::Increment);
        let after = store.send(TestAction::Increment);

        assert_eq!(before.value, 1);
        assert_eq!(after.value, 2);
        assert!(!Arc::ptr_eq(&before, &after));
    }

    #[test]
    fn test_version_starts_at_zero() {
        let store = Store::new(TestState::default(), TestReducer, ());
        assert_eq!(store.version(), 0);
        assert_eq!(*store.snapshot(), TestState::default());
    }
}
