//! # Swap Market Testing
//!
//! Testing utilities and helpers for the swap market's reducer architecture.
//!
//! This crate provides:
//! - Deterministic implementations of Environment traits
//! - A Given-When-Then harness for reducers
//!
//! ## Example
//!
//! ```ignore
//! use swapmarket_testing::{test_clock, SequentialIdGenerator};
//! use swapmarket_runtime::Store;
//!
//! #[test]
//! fn lists_a_ticket() {
//!     let ids = Arc::new(SequentialIdGenerator::new());
//!     let env = MarketEnvironment::new(Arc::new(test_clock()), ids);
//!     let mut store = Store::new(MarketState::default(), MarketReducer::new(), env);
//!
//!     let snapshot = store.send(MarketAction::CreateTicket { id: TicketId::new(1), draft });
//!     assert_eq!(snapshot.tickets.len(), 1);
//! }
//! ```

use chrono::{DateTime, Utc};
use swapmarket_core::environment::{Clock, IdGenerator};

mod reducer_test;

pub use reducer_test::ReducerTest;

/// Deterministic implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, IdGenerator, Utc};
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use swapmarket_testing::mocks::FixedClock;
    /// use swapmarket_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
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

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }

    /// Predictable ids: `start`, `start + 1`, `start + 2`, ...
    ///
    /// ```
    /// use swapmarket_testing::mocks::SequentialIdGenerator;
    /// use swapmarket_core::environment::IdGenerator;
    ///
    /// let ids = SequentialIdGenerator::starting_at(100);
    /// assert_eq!(ids.next_id(), 100);
    /// assert_eq!(ids.next_id(), 101);
    /// ```
    #[derive(Debug)]
    pub struct SequentialIdGenerator {
        next: AtomicU64,
    }

    impl SequentialIdGenerator {
        /// Ids starting at 1
        #[must_use]
        pub const fn new() -> Self {
            Self::starting_at(1)
        }

        /// Ids starting at `start`
        #[must_use]
        pub const fn starting_at(start: u64) -> Self {
            Self {
                next: AtomicU64::new(start),
            }
        }
    }

    impl Default for SequentialIdGenerator {
        fn default() -> Self {
            Self::new()
        }
    }

    impl IdGenerator for SequentialIdGenerator {
        fn next_id(&self) -> u64 {
            self.next.fetch_add(1, Ordering::Relaxed)
        }
    }
}

/// Test helpers and utilities
pub mod helpers {
    /// Route `tracing` output through the test harness
    ///
    /// Honors `RUST_LOG`, defaulting to `debug`. Safe to call from every
    /// test; only the first call installs the subscriber.
    pub fn init_test_tracing() {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    }
}

// Re-export commonly used items
pub use helpers::init_test_tracing;
pub use mocks::{FixedClock, SequentialIdGenerator, test_clock};
