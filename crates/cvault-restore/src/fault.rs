use std::sync::{Mutex, PoisonError};

use crate::error::RestoreError;

/// Collects per-entry failures that should not abort a batch.
pub trait FailureSink: Send + Sync {
    fn add_recoverable(&self, err: RestoreError);
}

/// In-memory [`FailureSink`], safe to share across workers.
#[derive(Debug, Default)]
pub struct Bus {
    recovered: Mutex<Vec<RestoreError>>,
}

impl Bus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rendered messages of every recorded failure, in arrival order.
    pub fn recovered(&self) -> Vec<String> {
        self.lock().iter().map(ToString::to_string).collect()
    }

    pub fn into_recovered(self) -> Vec<RestoreError> {
        self.recovered
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<RestoreError>> {
        self.recovered.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl FailureSink for Bus {
    fn add_recoverable(&self, err: RestoreError) {
        self.lock().push(err);
    }
}
