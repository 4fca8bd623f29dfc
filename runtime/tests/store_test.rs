//! Integration tests for the Store: snapshots, versions and effect feedback.

use proptest::prelude::*;
use std::sync::Arc;
use swapmarket_core::environment::Clock;
use swapmarket_core::{DateTime, SmallVec, Utc, effect::Effect, reducer::Reducer, smallvec};
use swapmarket_runtime::Store;
use swapmarket_testing::{FixedClock, init_test_tracing, test_clock};

#[derive(Clone, Debug, Default, PartialEq)]
struct LogState {
    entries: Vec<(u32, DateTime<Utc>)>,
}

#[derive(Clone, Debug)]
enum LogAction {
    Append(u32),
    /// Appends `n`, then feeds `Append(n + 1)` back `depth` times
    Cascade { n: u32, depth: u8 },
}

struct LogEnvironment {
    clock: Arc<dyn Clock>,
}

struct LogReducer;

impl Reducer for LogReducer {
    type State = LogState;
    type Action = LogAction;
    type Environment = LogEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            LogAction::Append(n) => {
                state.entries.push((n, env.clock.now()));
                SmallVec::new()
            },
            LogAction::Cascade { n, depth } => {
                state.entries.push((n, env.clock.now()));
                if depth == 0 {
                    SmallVec::new()
                } else {
                    smallvec![Effect::send(LogAction::Cascade {
                        n: n + 1,
                        depth: depth - 1,
                    })]
                }
            },
        }
    }
}

fn log_store() -> Store<LogState, LogAction, LogEnvironment, LogReducer> {
    let env = LogEnvironment {
        clock: Arc::new(test_clock()),
    };
    Store::new(LogState::default(), LogReducer, env)
}

#[test]
fn test_reducer_sees_injected_clock() {
    init_test_tracing();
    let mut store = log_store();

    let snapshot = store.send(LogAction::Append(7));

    assert_eq!(snapshot.entries, vec![(7, test_clock().now())]);
}

#[test]
fn test_cascade_is_drained_in_order() {
    init_test_tracing();
    let mut store = log_store();

    let snapshot = store.send(LogAction::Cascade { n: 10, depth: 3 });

    let values: Vec<u32> = snapshot.entries.iter().map(|(n, _)| *n).collect();
    assert_eq!(values, vec![10, 11, 12, 13]);
    assert_eq!(store.version(), 4);
}

#[test]
fn test_environment_is_reachable_from_store() {
    let clock = FixedClock::new(test_clock().now());
    let mut store = Store::new(
        LogState::default(),
        LogReducer,
        LogEnvironment {
            clock: Arc::new(clock),
        },
    );

    store.send(LogAction::Append(1));
    assert_eq!(store.environment().clock.now(), test_clock().now());
}

fn action_strategy() -> impl Strategy<Value = LogAction> {
    prop_oneof![
        any::<u32>().prop_map(|n| LogAction::Append(n % 1_000)),
        (0u32..1_000, 0u8..5).prop_map(|(n, depth)| LogAction::Cascade { n, depth }),
    ]
}

fn reduced_count(action: &LogAction) -> u64 {
    match action {
        LogAction::Append(_) => 1,
        LogAction::Cascade { depth, .. } => u64::from(*depth) + 1,
    }
}

proptest! {
    #[test]
    fn prop_version_counts_every_reduced_action(
        actions in prop::collection::vec(action_strategy(), 0..20)
    ) {
        let mut store = log_store();
        let mut expected = 0;

        for action in actions {
            expected += reduced_count(&action);
            store.send(action);
        }

        prop_assert_eq!(store.version(), expected);
        prop_assert_eq!(store.state(|s| s.entries.len() as u64), expected);
    }

    #[test]
    fn prop_held_snapshots_never_change(
        actions in prop::collection::vec(action_strategy(), 1..20)
    ) {
        let mut store = log_store();
        let mut held = Vec::new();

        for action in actions {
            let snapshot = store.send(action);
            held.push(((*snapshot).clone(), snapshot));
        }

        for (copy, snapshot) in &held {
            prop_assert_eq!(copy, snapshot.as_ref());
        }
    }
}
