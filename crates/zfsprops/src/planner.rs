//! Execution planner - compiles a change list into convergence steps

use crate::diff::group_by_dataset;
use crate::error::Result;
use crate::types::{ChangeKind, ExecutionStep, PropertyChange};

/// An ordered list of steps, grouped per dataset
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionPlan {
    pub steps: Vec<ExecutionStep>,
}

impl ExecutionPlan {
    /// Create a new empty plan
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of steps in the plan
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check if plan is empty
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Iterate steps in execution order
    pub fn iter(&self) -> std::slice::Iter<'_, ExecutionStep> {
        self.steps.iter()
    }

    /// Datasets touched by the plan, in execution order
    pub fn datasets(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for step in &self.steps {
            let dataset = step.dataset();
            if !seen.contains(&dataset) {
                seen.push(dataset);
            }
        }
        seen
    }
}

impl IntoIterator for ExecutionPlan {
    type Item = ExecutionStep;
    type IntoIter = std::vec::IntoIter<ExecutionStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.into_iter()
    }
}

/// Build an execution plan from a change list.
///
/// Every addition and modification on a dataset is folded into a single
/// `set` step, which runs before one `inherit` step per removed property.
/// Datasets are planned in the order they first appear in `changes`.
pub fn plan(changes: &[PropertyChange]) -> Result<ExecutionPlan> {
    let mut execution_plan = ExecutionPlan::new();

    for (dataset, group) in group_by_dataset(changes) {
        let mut assignments = Vec::new();
        let mut reverts = Vec::new();

        for change in group {
            let kind = change.kind()?;
            match &change.expected {
                Some(expected) if kind != ChangeKind::Removal => {
                    assignments.push((change.property.clone(), expected.clone()));
                }
                _ => reverts.push(change.property.clone()),
            }
        }

        if !assignments.is_empty() {
            execution_plan.steps.push(ExecutionStep::Set {
                dataset: dataset.to_string(),
                assignments,
            });
        }

        execution_plan
            .steps
            .extend(reverts.into_iter().map(|property| ExecutionStep::Inherit {
                dataset: dataset.to_string(),
                property,
            }));
    }

    log::debug!("Planned {} steps", execution_plan.len());

    Ok(execution_plan)
}
