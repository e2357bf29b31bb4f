//! Editor environment.

use crate::reconciler::Reconciler;
use crate::publish::RequiredFieldsValidator;
use std::sync::Arc;

/// External dependencies of the editor reducer.
///
/// # Type Parameters
///
/// - `G`: Entity gateway
/// - `C`: Clock
/// - `V`: Publish validator
#[derive(Debug)]
pub struct EditorEnvironment<G, C, V = RequiredFieldsValidator> {
    /// Shared reconciler, cloned into effect futures.
    pub reconciler: Arc<Reconciler<G, C, V>>,
}

impl<G, C, V> EditorEnvironment<G, C, V> {
    /// Create an environment around `reconciler`.
    #[must_use]
    pub fn new(reconciler: Reconciler<G, C, V>) -> Self {
        Self {
            reconciler: Arc::new(reconciler),
        }
    }
}

impl<G, C, V> Clone for EditorEnvironment<G, C, V> {
    fn clone(&self) -> Self {
        Self {
            reconciler: Arc::clone(&self.reconciler),
        }
    }
}
