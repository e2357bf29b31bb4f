//! # Eventdesk Testing
//!
//! Testing utilities for the Eventdesk crates.
//!
//! - [`FixedClock`] and [`test_clock`] for deterministic status derivation
//! - [`ReducerTest`] for Given/When/Then reducer tests
//! - [`init_test_tracing`] to see `tracing` output from failing tests
//!
//! ## Example
//!
//! ```ignore
//! use eventdesk_testing::{ReducerTest, test_clock};
//!
//! ReducerTest::new(EditorReducer::new())
//!     .with_env(test_env())
//!     .given_state(EditorState::new(EventDraft::new()))
//!     .when_action(EditorAction::AddItem { kind: ItemKind::Session })
//!     .then_state(|state| assert_eq!(state.draft.sessions.len(), 1))
//!     .run();
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use eventdesk_core::environment::Clock;


pub use reducer_test::{assertions, ReducerTest};

/// Mock implementations of environment traits
pub mod mocks {
    use super::{Clock, DateTime, NaiveDate, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// # Example
    ///
    /// ```
    /// use eventdesk_testing::mocks::FixedClock;
    /// use eventdesk_core::environment::Clock;
    /// use chrono::NaiveDate;
    ///
    /// let day = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap_or_default();
    /// let clock = FixedClock::on_date(day);
    /// assert_eq!(clock.now().date_naive(), day);
    /// ```
    #[derive(Debug, Clone, Copy)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }

        /// Clock pinned to noon UTC on the given day
        #[must_use]
        pub fn on_date(day: NaiveDate) -> Self {
            let noon = day.and_hms_opt(12, 0, 0).unwrap_or_default();
            Self::new(noon.and_utc())
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Default fixed clock for tests: 2025-03-01 12:00:00 UTC
    ///
    /// # Panics
    ///
    /// Panics if the hardcoded date is invalid, which it is not.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::on_date(
            NaiveDate::from_ymd_opt(2025, 3, 1).expect("hardcoded date should be valid"),
        )
    }
}

pub use mocks::{test_clock, FixedClock};

/// Install a `tracing` subscriber for tests
///
/// Honors `RUST_LOG` and writes through the test writer so output only shows
/// for failing tests. Safe to call from every test.
pub fn init_test_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}
