//! Given-When-Then harness for reducers.
//!
//! A test starts from a state, reduces one or more actions against a fixed
//! environment, then checks the resulting state and the effects returned
//! along the way.

#![allow(clippy::module_name_repetitions)] // ReducerTest is the natural name

use std::fmt::Debug;
use swapmarket_core::{effect::Effect, reducer::Reducer};

type StateAssertion<S> = Box<dyn FnOnce(&S)>;

/// Reduces actions against a state and checks the outcome
///
/// ```ignore
/// use swapmarket_testing::ReducerTest;
///
/// ReducerTest::new(MarketReducer::new(), test_environment())
///     .given_state(MarketState::with_tickets(seed_tickets()))
///     .when_action(MarketAction::DeleteTicket { id: TicketId::new(42) })
///     .then_state_unchanged()
///     .then_no_effects()
///     .run();
/// ```
pub struct ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    reducer: R,
    environment: E,
    state: S,
    actions: Vec<A>,
    state_assertions: Vec<StateAssertion<S>>,
    expect_unchanged: bool,
    expect_no_effects: bool,
}

impl<R, S, A, E> ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
    S: Clone + Default + PartialEq + Debug,
    A: Debug,
{
    /// Starts a test of `reducer` with `environment` and a default state
    #[must_use]
    pub fn new(reducer: R, environment: E) -> Self {
        Self {
            reducer,
            environment,
            state: S::default(),
            actions: Vec::new(),
            state_assertions: Vec::new(),
            expect_unchanged: false,
            expect_no_effects: false,
        }
    }

    /// Replaces the starting state (Given)
    #[must_use]
    pub fn given_state(mut self, state: S) -> Self {
        self.state = state;
        self
    }

    /// Queues an action; actions are reduced in the order queued (When)
    #[must_use]
    pub fn when_action(mut self, action: A) -> Self {
        self.actions.push(action);
        self
    }

    /// Checks the state after every queued action has been reduced (Then)
    #[must_use]
    pub fn then_state<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&S) + 'static,
    {
        self.state_assertions.push(Box::new(assertion));
        self
    }

    /// Requires the final state to equal the given one
    #[must_use]
    pub const fn then_state_unchanged(mut self) -> Self {
        self.expect_unchanged = true;
        self
    }

    /// Requires every reduced action to return only no-op effects
    #[must_use]
    pub const fn then_no_effects(mut self) -> Self {
        self.expect_no_effects = true;
        self
    }

    /// Reduces the queued actions and runs the checks
    ///
    /// # Panics
    ///
    /// Panics if no action was queued or any check fails.
    #[allow(clippy::panic)] // Test harness
    pub fn run(self) {
        assert!(
            !self.actions.is_empty(),
            "At least one action must be queued with when_action()"
        );

        let given = self.expect_unchanged.then(|| self.state.clone());
        let mut state = self.state;
        let mut effects: Vec<Effect<A>> = Vec::new();
        for action in self.actions {
            effects.extend(self.reducer.reduce(&mut state, action, &self.environment));
        }

        if let Some(given) = given {
            assert_eq!(state, given, "Expected the state to be left unchanged");
        }
        if self.expect_no_effects {
            assert!(
                effects.iter().all(Effect::is_none),
                "Expected no effects, but found {effects:?}"
            );
        }
        for assertion in self.state_assertions {
            assertion(&state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swapmarket_core::{SmallVec, smallvec};

    #[derive(Clone, Debug, Default, PartialEq)]
    struct Tally {
        count: i32,
    }

    #[derive(Debug)]
    enum TallyAction {
        Add(i32),
        Ignore,
        Echo,
    }

    struct TallyReducer;

    impl Reducer for TallyReducer {
        type State = Tally;
        type Action = TallyAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Tally,
            action: TallyAction,
            _env: &(),
        ) -> SmallVec<[Effect<TallyAction>; 4]> {
            match action {
                TallyAction::Add(n) => {
                    state.count += n;
                    smallvec![Effect::None]
                },
                TallyAction::Ignore => SmallVec::new(),
                TallyAction::Echo => smallvec![Effect::send(TallyAction::Add(1))],
            }
        }
    }

    #[test]
    fn test_actions_reduce_in_order() {
        ReducerTest::new(TallyReducer, ())
            .given_state(Tally { count: 5 })
            .when_action(TallyAction::Add(-2))
            .when_action(TallyAction::Add(10))
            .then_state(|state| assert_eq!(state.count, 13))
            .then_no_effects()
            .run();
    }

    #[test]
    fn test_unchanged_state_passes() {
        ReducerTest::new(TallyReducer, ())
            .when_action(TallyAction::Ignore)
            .then_state_unchanged()
            .run();
    }

    #[test]
    #[should_panic(expected = "left unchanged")]
    fn test_changed_state_fails_unchanged_check() {
        ReducerTest::new(TallyReducer, ())
            .when_action(TallyAction::Add(1))
            .then_state_unchanged()
            .run();
    }

    #[test]
    #[should_panic(expected = "Expected no effects")]
    fn test_send_effect_fails_no_effects_check() {
        ReducerTest::new(TallyReducer, ())
            .when_action(TallyAction::Add(1))
            .when_action(TallyAction::Echo)
            .then_no_effects()
            .run();
    }

    #[test]
    #[should_panic(expected = "At least one action")]
    fn test_requires_an_action() {
        ReducerTest::new(TallyReducer, ()).run();
    }
}
