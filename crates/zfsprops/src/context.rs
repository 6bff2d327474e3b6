//! Provider traits for running and observing a plan
//!
//! These traits keep the crate free of any dependency on the `zfs`
//! binary, terminal prompts, or progress widgets.

use crate::types::{ExecutionStep, StepOutcome};
use anyhow::Result;

/// Runs a single execution step against the system
///
/// The production implementation invokes `zfs` with [`ExecutionStep::tokens`];
/// tests use recording mocks.
pub trait StepRunner {
    /// Run one step, returning an error if it did not take effect
    fn run(&self, step: &ExecutionStep) -> Result<()>;
}

/// Progress callback for execution
pub trait ProgressCallback {
    /// Called once before the first step with the number of steps
    fn on_start(&mut self, total: usize);

    /// Called before a step is run
    fn on_step_start(&mut self, step: &ExecutionStep);

    /// Called after a step has an outcome
    fn on_step_complete(&mut self, step: &ExecutionStep, outcome: &StepOutcome);

    /// Called after the last step
    fn on_finish(&mut self);
}

/// Confirmation callback for user interaction
pub trait ConfirmCallback {
    /// Ask the user to confirm an action
    ///
    /// # Returns
    /// `true` if the user confirmed, `false` otherwise
    fn confirm(&mut self, prompt: &str) -> Result<bool>;
}

/// No-op progress callback
pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_start(&mut self, _total: usize) {}
    fn on_step_start(&mut self, _step: &ExecutionStep) {}
    fn on_step_complete(&mut self, _step: &ExecutionStep, _outcome: &StepOutcome) {}
    fn on_finish(&mut self) {}
}

/// Auto-confirm callback (always returns true)
pub struct AutoConfirm;

impl ConfirmCallback for AutoConfirm {
    fn confirm(&mut self, _prompt: &str) -> Result<bool> {
        Ok(true)
    }
}

/// Auto-decline callback (always returns false)
pub struct AutoDecline;

impl ConfirmCallback for AutoDecline {
    fn confirm(&mut self, _prompt: &str) -> Result<bool> {
        Ok(false)
    }
}
