//! # Eventdesk Runtime
//!
//! The [`Store`] owns reducer state and executes the effects a reducer returns.
//!
//! Execution is cooperative and single-path: [`Store::send`] reduces the
//! action, then runs every resulting effect on the caller's task, one at a
//! time. Actions produced by effects are queued and reduced in FIFO order
//! until nothing is left. The only suspension points are the awaited effect
//! futures, which in the editor are backend round-trips.
//!
//! ## Example
//!
//! ```ignore
//! use eventdesk_runtime::Store;
//!
//! let store = Store::new(EditorState::new(draft), EditorReducer::new(), env);
//! store.send(EditorAction::Save).await?;
//! let failures = store.state(|s| s.last_report.as_ref().map(|r| r.failures().len())).await;
//! ```

use eventdesk_core::{effect::Effect, reducer::Reducer};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur while dispatching an action
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// Effects kept producing actions past the configured bound
        ///
        /// This almost always means two actions trigger each other.
        #[error("Feedback loop exceeded {0} actions for a single send")]
        FeedbackLimitExceeded(usize),
    }
}

pub use error::StoreError;

/// Store configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    /// Maximum number of actions reduced for one call to [`Store::send`]
    ///
    /// Default: 256
    pub max_actions_per_send: usize,
}

impl StoreConfig {
    /// Set the feedback bound.
    #[must_use]
    pub const fn with_max_actions_per_send(mut self, max: usize) -> Self {
        self.max_actions_per_send = max;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_actions_per_send: 256,
        }
    }
}

/// The Store - runtime for a reducer
///
/// Cloning a store is cheap and every clone shares the same state.
pub struct Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    state: Arc<RwLock<S>>,
    reducer: Arc<R>,
    environment: Arc<E>,
    config: StoreConfig,
    /// Serializes dispatch so only one action chain runs at a time.
    dispatch: Arc<Mutex<()>>,
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    /// Create a new store with initial state, reducer, and environment
    #[must_use]
    pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
        Self::with_config(initial_state, reducer, environment, StoreConfig::default())
    }

    /// Create a new store with custom configuration
    #[must_use]
    pub fn with_config(initial_state: S, reducer: R, environment: E, config: StoreConfig) -> Self {
        Self {
            state: Arc::new(RwLock::new(initial_state)),
            reducer: Arc::new(reducer),
            environment: Arc::new(environment),
            config,
            dispatch: Arc::new(Mutex::new(())),
        }
    }

    /// Send an action and run it to quiescence
    ///
    /// Returns the number of actions reduced, including the initial one.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::FeedbackLimitExceeded`] if the chain of
    /// feedback actions grows past [`StoreConfig::max_actions_per_send`].
    /// Actions reduced before the limit keep their state changes.
    #[tracing::instrument(skip(self, action), name = "store_send")]
    pub async fn send(&self, action: A) -> Result<usize, StoreError> {
        let _dispatch = self.dispatch.lock().await;

        let mut actions = VecDeque::from([action]);
        let mut reduced = 0usize;

        while let Some(action) = actions.pop_front() {
            if reduced >= self.config.max_actions_per_send {
                tracing::error!(reduced, "Feedback limit reached, dropping remaining actions");
                return Err(StoreError::FeedbackLimitExceeded(reduced));
            }

            let effects = {
                let mut state = self.state.write().await;
                self.reducer.reduce(&mut state, action, &self.environment)
            };
            reduced += 1;

            let mut pending: VecDeque<Effect<A>> = effects.into_iter().collect();
            while let Some(effect) = pending.pop_front() {
                match effect {
                    Effect::None => {
                        metrics::counter!("store.effects.executed", "type" => "none").increment(1);
                    },
                    Effect::Sequential(effects) => {
                        metrics::counter!("store.effects.executed", "type" => "sequential")
                            .increment(1);
                        for effect in effects.into_iter().rev() {
                            pending.push_front(effect);
                        }
                    },
                    Effect::Future(fut) => {
                        metrics::counter!("store.effects.executed", "type" => "future").increment(1);
                        if let Some(feedback) = fut.await {
                            tracing::trace!("Effect::Future produced an action");
                            actions.push_back(feedback);
                        }
                    },
                }
            }
        }

        Ok(reduced)
    }

    /// Read current state through a closure
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&S) -> T,
    {
        let state = self.state.read().await;
        f(&state)
    }

    /// Access the injected environment
    #[must_use]
    pub fn environment(&self) -> &E {
        &self.environment
    }
}

impl<S, A, E, R> Clone for Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            reducer: Arc::clone(&self.reducer),
            environment: Arc::clone(&self.environment),
            config: self.config,
            dispatch: Arc::clone(&self.dispatch),
        }
    }
}
