//! Lifecycle manager: ordered, exactly-once, fail-fast bootstrap.
//!
//! # Responsibilities
//! - Keep named initialization steps in registration order
//! - Run each step until it succeeds once, never again afterwards
//! - Stop at the first failing step and report it
//! - Gate application start on every step having succeeded
//!
//! # Locking
//! ```text
//! state lock : step list + completion flags + ready flag (short sections only)
//! exec lock  : held for a whole `initialize` / `exec`, so steps never run twice
//! ```
//! The state lock is released while an action runs, so a step may call
//! `is_initialized` or `register`. A step must not call `initialize`,
//! `exec` or `run` on the same Manager (the exec lock is not reentrant).

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use crate::lifecycle::error::{DuplicateNameError, InitError, StepResult};
use crate::lifecycle::step::{Action, InitStep, StepStatus};
use crate::observability::metrics;

#[derive(Debug, Default)]
struct State {
    steps: Vec<InitStep>,
    /// name -> position in `steps`.
    positions: HashMap<String, usize>,
    ready: bool,
}

impl State {
    fn push(&mut self, step: InitStep) -> Result<usize, DuplicateNameError> {
        if self.positions.contains_key(&step.name) {
            return Err(DuplicateNameError { name: step.name });
        }
        let position = self.steps.len();
        self.positions.insert(step.name.clone(), position);
        self.steps.push(step);
        // A pending step means the process is no longer fully bootstrapped.
        self.set_ready(false);
        Ok(position)
    }

    // Flag and gauge change together, under the state lock.
    fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
        metrics::set_ready(ready);
    }
}

/// Orchestrates named initialization steps.
///
/// One instance is created in `main` and shared by reference (or `Arc`) with
/// whoever registers steps. It holds no resource handles itself.
#[derive(Debug, Default)]
pub struct Manager {
    state: Mutex<State>,
    exec: Mutex<()>,
}

impl Manager {
    /// Create an empty manager; nothing is ready until `initialize` runs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step without running it.
    pub fn register<F>(&self, name: impl Into<String>, action: F) -> Result<(), DuplicateNameError>
    where
        F: Fn() -> StepResult + Send + Sync + 'static,
    {
        let step = InitStep::new(name, action);
        let name = step.name.clone();
        let position = self.lock_state().push(step).inspect_err(|e| {
            tracing::warn!(step = %e.name, "Rejected duplicate initialization step");
        })?;

        tracing::debug!(step = %name, position, "Initialization step registered");
        Ok(())
    }

    /// Register a step and run it before returning.
    ///
    /// Used for steps whose failure must abort bootstrap on the spot (config
    /// loading) instead of surfacing on a later `initialize`.
    pub fn exec<F>(&self, name: impl Into<String>, action: F) -> Result<(), InitError>
    where
        F: Fn() -> StepResult + Send + Sync + 'static,
    {
        let _exec = self.lock_exec();
        let position = self.lock_state().push(InitStep::new(name, action))?;
        self.run_step(position)
    }

    /// Run every pending step in registration order.
    ///
    /// Completed steps are skipped. The first failure is returned and later
    /// steps are left untouched; `ready` is only set after the walk reached
    /// the end of the list.
    pub fn initialize(&self) -> Result<(), InitError> {
        let _exec = self.lock_exec();
        let started = Instant::now();
        let mut position = 0;

        loop {
            let pending = {
                let mut state = self.lock_state();
                match state.steps.get(position) {
                    Some(step) => !step.completed,
                    None => {
                        // Checked under the same lock that registration takes,
                        // so no step can slip in between the walk and the flag.
                        state.set_ready(true);
                        break;
                    }
                }
            };

            if pending {
                if let Err(e) = self.run_step(position) {
                    self.lock_state().set_ready(false);
                    return Err(e);
                }
            }
            position += 1;
        }

        tracing::info!(
            steps = position,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Bootstrap complete"
        );
        Ok(())
    }

    /// Run `f` once every step has succeeded.
    ///
    /// Bootstraps first if needed. On failure the error is logged and
    /// returned and `f` is never invoked; terminating the process is left to
    /// the caller.
    pub fn run<F, T>(&self, f: F) -> Result<T, InitError>
    where
        F: FnOnce() -> T,
    {
        if !self.is_ready() {
            if let Err(e) = self.initialize() {
                tracing::error!(step = %e.step(), error = %e, "Bootstrap failed, application not started");
                return Err(e);
            }
        }
        Ok(f())
    }

    /// Whether the named step has completed successfully.
    pub fn is_initialized(&self, name: &str) -> bool {
        let state = self.lock_state();
        state
            .positions
            .get(name)
            .is_some_and(|&position| state.steps[position].completed)
    }

    /// Whether every registered step has completed.
    pub fn is_ready(&self) -> bool {
        self.lock_state().ready
    }

    /// Snapshot of all steps in registration order.
    pub fn status(&self) -> Vec<StepStatus> {
        self.lock_state().steps.iter().map(InitStep::status).collect()
    }

    fn run_step(&self, position: usize) -> Result<(), InitError> {
        let (name, action): (String, Action) = {
            let state = self.lock_state();
            let step = &state.steps[position];
            if step.completed {
                return Ok(());
            }
            (step.name.clone(), step.action.clone())
        };

        tracing::info!(step = %name, "Running initialization step");
        let started = Instant::now();
        let outcome = action();
        let elapsed = started.elapsed();
        metrics::record_step(&name, outcome.is_ok(), elapsed);

        match outcome {
            Ok(()) => {
                self.lock_state().steps[position].completed = true;
                tracing::info!(
                    step = %name,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Initialization step completed"
                );
                Ok(())
            }
            Err(source) => {
                tracing::error!(step = %name, error = %source, "Initialization step failed");
                Err(InitError::Step { step: name, source })
            }
        }
    }

    // Steps run outside the state lock, so a panicking action cannot leave
    // the bookkeeping half-written; recovering from poison is safe here.
    fn lock_state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_exec(&self) -> MutexGuard<'_, ()> {
        self.exec.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
