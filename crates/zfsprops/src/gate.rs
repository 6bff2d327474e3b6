//! Apply gate - turns an explicit decision into a plan or an abort

use crate::context::ConfirmCallback;
use crate::error::Result;
use crate::planner::{ExecutionPlan, plan};
use crate::types::PropertyChange;

/// Whether the operator agreed to apply the changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyDecision {
    Apply,
    Decline,
}

impl ApplyDecision {
    /// Ask a confirmation callback for a decision
    pub fn ask<C: ConfirmCallback + ?Sized>(confirm: &mut C, prompt: &str) -> anyhow::Result<Self> {
        Ok(if confirm.confirm(prompt)? {
            Self::Apply
        } else {
            Self::Decline
        })
    }
}

impl From<bool> for ApplyDecision {
    fn from(confirmed: bool) -> Self {
        if confirmed { Self::Apply } else { Self::Decline }
    }
}

/// What the gate let through
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// Nothing to apply
    NoChanges,
    /// Changes exist but the operator declined
    Declined,
    /// Changes approved, with the plan to run
    Proceed(ExecutionPlan),
}

/// Decide what to do with a change list.
///
/// An empty change list never reaches the planner, whatever the decision.
pub fn apply_gate(changes: &[PropertyChange], decision: ApplyDecision) -> Result<GateOutcome> {
    if changes.is_empty() {
        return Ok(GateOutcome::NoChanges);
    }

    match decision {
        ApplyDecision::Decline => Ok(GateOutcome::Declined),
        ApplyDecision::Apply => Ok(GateOutcome::Proceed(plan(changes)?)),
    }
}
