//! Thread-safe accumulation of per-file failures.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::errors::{AggregateError, TransformError};

/// Ordered list of failures shared by every worker.
#[derive(Debug, Default)]
pub struct ErrorCollector {
    errors: Mutex<Vec<TransformError>>,
}

impl ErrorCollector {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a failure.
    pub fn add(&self, error: TransformError) {
        self.lock().push(error);
    }

    /// Returns whether any failure was recorded.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.lock().is_empty()
    }

    /// Returns the number of recorded failures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns whether no failure was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.has_errors()
    }

    /// Combines the recorded failures, or returns `None` if there were none.
    #[must_use]
    pub fn into_aggregate(self) -> Option<AggregateError> {
        let errors = self
            .errors
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        (!errors.is_empty()).then(|| AggregateError::new(errors))
    }

    /// Takes the recorded failures out of a shared collector.
    pub(crate) fn drain(&self) -> Option<AggregateError> {
        let errors = std::mem::take(&mut *self.lock());
        (!errors.is_empty()).then(|| AggregateError::new(errors))
    }

    // A worker that panicked mid-push still leaves a usable Vec.
    fn lock(&self) -> MutexGuard<'_, Vec<TransformError>> {
        self.errors.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
