//! Initialization step record.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::lifecycle::error::StepResult;

/// Shared, re-invocable step action.
///
/// Stored behind an `Arc` so the Manager can clone it out of its state lock
/// and run it without holding that lock.
pub type Action = Arc<dyn Fn() -> StepResult + Send + Sync + 'static>;

/// A named initialization step.
pub struct InitStep {
    /// Unique identifier, used in logs and errors.
    pub name: String,
    /// The work to perform.
    pub action: Action,
    /// True once `action` has returned success.
    pub completed: bool,
}

impl InitStep {
    /// Create a pending step.
    pub fn new<F>(name: impl Into<String>, action: F) -> Self
    where
        F: Fn() -> StepResult + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            action: Arc::new(action),
            completed: false,
        }
    }

    /// Snapshot of this step's state.
    pub fn status(&self) -> StepStatus {
        StepStatus {
            name: self.name.clone(),
            completed: self.completed,
        }
    }
}

impl fmt::Debug for InitStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InitStep")
            .field("name", &self.name)
            .field("completed", &self.completed)
            .finish_non_exhaustive()
    }
}

/// Read-only view of a step, as reported by `Manager::status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepStatus {
    /// Step name as registered.
    pub name: String,
    /// True once the step's action succeeded.
    pub completed: bool,
}
