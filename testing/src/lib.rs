//! # Todo Sections Testing
//!
//! Testing utilities for the Todo Sections workspace.
//!
//! This crate provides:
//! - Mock implementations of Environment traits ([`FixedClock`], [`MockTodoApi`])
//! - The Given-When-Then [`ReducerTest`] builder
//! - proptest strategies for domain types
//!
//! ## Example
//!
//! ```ignore
//! use todo_sections_testing::{test_clock, MockTodoApi};
//! use todo_sections_runtime::Store;
//!
//! #[tokio::test]
//! async fn loads_sections() {
//!     let api = MockTodoApi::new().with_users(users()).with_todos(todos());
//!     let store = Store::new(TodosState::default(), TodosReducer, env(api.clone()));
//!
//!     let mut handle = store.send(TodosAction::FetchAll { fetch: 1 }).await?;
//!     handle.wait().await;
//!
//!     assert_eq!(store.snapshot().sections.len(), 2);
//! }
//! ```

use chrono::{DateTime, Utc};
use todo_sections_core::environment::Clock;

mod api_mock;

pub use reducer_test::{ReducerTest, assertions, drain_effects};

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    pub use crate::api_mock::{ApiCall, Endpoint, MockTodoApi};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use todo_sections_testing::mocks::FixedClock;
    /// use todo_sections_core::environment::Clock;
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

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// Panics if the hardcoded timestamp fails to parse.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Property-based testing strategies for domain records
pub mod properties {
    use proptest::prelude::*;
    use todo_sections_core::model::{Todo, TodoId, User, UserId};

    /// Up to `max_users` users with ids `1..=n` and usernames `user{id}`
    pub fn arb_users(max_users: usize) -> impl Strategy<Value = Vec<User>> {
        (0..=max_users).prop_map(|n| {
            (1..=n as u64)
                .map(|id| User::new(UserId::new(id), format!("user{id}")))
                .collect()
        })
    }

    /// Todos with unique ids whose owners range over `1..=max_owner`
    ///
    /// Owners beyond the generated user set exercise the unknown-owner path.
    pub fn arb_todos(max_owner: u64, max_len: usize) -> impl Strategy<Value = Vec<Todo>> {
        prop::collection::vec((1..=max_owner.max(1), any::<bool>()), 0..max_len).prop_map(
            |rows| {
                rows.into_iter()
                    .enumerate()
                    .map(|(i, (owner, completed))| {
                        let id = i as u64 + 1;
                        Todo::new(TodoId::new(id), UserId::new(owner), format!("todo {id}"), completed)
                    })
                    .collect()
            },
        )
    }

    /// A consistent user set with todos partly owned by unknown users
    pub fn arb_records() -> impl Strategy<Value = (Vec<User>, Vec<Todo>)> {
        (arb_users(4), arb_todos(6, 24))
    }
}

// Re-export commonly used items
pub use mocks::{ApiCall, Endpoint, FixedClock, MockTodoApi, test_clock};
