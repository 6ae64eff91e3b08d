//! Compensating actions for multi-step remote operations
//!
//! Remote calls cannot be wrapped in a transaction, so each step that leaves
//! something behind on the server registers an undo action. When a later step
//! fails the scope is rolled back: undo actions run newest first, and their
//! own failures are logged and collected instead of replacing the original
//! error. When every step succeeds the scope is committed and nothing runs.

use futures::future::{BoxFuture, FutureExt};
use odoolink_core::OdooError;
use std::future::Future;
use tracing::warn;

type UndoAction<'a> = Box<dyn FnOnce() -> BoxFuture<'a, Result<(), OdooError>> + Send + 'a>;

/// Scope of registered undo actions
pub struct Compensation<'a> {
    actions: Vec<(String, UndoAction<'a>)>,
}

impl<'a> Compensation<'a> {
    pub fn new() -> Self {
        Self {
            actions: Vec::new(),
        }
    }

    /// Register an undo action for a step that just succeeded
    pub fn register<F, Fut>(&mut self, label: impl Into<String>, undo: F)
    where
        F: FnOnce() -> Fut + Send + 'a,
        Fut: Future<Output = Result<(), OdooError>> + Send + 'a,
    {
        self.actions
            .push((label.into(), Box::new(move || undo().boxed())));
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Discard all undo actions
    pub fn commit(mut self) {
        self.actions.clear();
    }

    /// Run the undo actions in reverse registration order.
    ///
    /// Returns the failed actions with their errors.
    pub async fn rollback(mut self) -> Vec<(String, OdooError)> {
        let mut failures = Vec::new();

        while let Some((label, undo)) = self.actions.pop() {
            warn!(action = %label, "Running compensating action");
            if let Err(e) = undo().await {
                warn!(action = %label, error = %e, "Compensating action failed");
                failures.push((label, e));
            }
        }

        failures
    }
}

impl Default for Compensation<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Compensation<'_> {
    fn drop(&mut self) {
        if !self.actions.is_empty() {
            let labels: Vec<&str> = self.actions.iter().map(|(label, _)| label.as_str()).collect();
            warn!(
                actions = ?labels,
                "Compensation scope dropped without commit or rollback"
            );
        }
    }
}
