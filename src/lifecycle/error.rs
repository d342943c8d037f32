//! Bootstrap error types.

use thiserror::Error;

/// Boxed error returned by step actions.
///
/// Collaborators keep their own typed errors; a step wraps whatever it
/// calls with `?` and the Manager only needs to display it.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Outcome of a single step action.
pub type StepResult = Result<(), BoxError>;

/// A step name collided with one that is already registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("initialization step '{name}' is already registered")]
pub struct DuplicateNameError {
    /// The rejected name.
    pub name: String,
}

/// Errors surfaced by `exec`, `initialize` and `run`.
#[derive(Debug, Error)]
pub enum InitError {
    /// `exec` was handed a name that is already registered.
    #[error(transparent)]
    Duplicate(#[from] DuplicateNameError),

    /// A step action reported failure.
    #[error("initialization step '{step}' failed: {source}")]
    Step {
        /// Name of the failing step.
        step: String,
        /// Underlying cause reported by the action.
        #[source]
        source: BoxError,
    },
}

impl InitError {
    /// Name of the step this error refers to.
    pub fn step(&self) -> &str {
        match self {
            InitError::Duplicate(e) => &e.name,
            InitError::Step { step, .. } => step,
        }
    }
}
