//! Diff computation between desired and actual dataset properties

use crate::error::Result;
use crate::types::{ActualState, ChangeKind, DesiredDatasetSpec, DesiredState, PropertyChange};
use indexmap::IndexMap;

/// Compute the property changes needed to converge `actual` onto `desired`.
///
/// Only datasets named in the declaration are compared; anything else in the
/// snapshot is unmanaged and left alone. Within a dataset, additions and
/// modifications come first in declared order, followed by removals in
/// snapshot order.
pub fn diff(desired: &DesiredState, actual: &ActualState) -> Vec<PropertyChange> {
    let mut changes = Vec::new();

    for (dataset, spec) in &desired.datasets {
        diff_dataset(dataset, spec, actual, &mut changes);
    }

    log::debug!(
        "Computed {} changes across {} managed datasets",
        changes.len(),
        desired.datasets.len()
    );

    changes
}

fn diff_dataset(
    dataset: &str,
    spec: &DesiredDatasetSpec,
    actual: &ActualState,
    changes: &mut Vec<PropertyChange>,
) {
    for (property, expected) in &spec.properties {
        if spec.is_ignored(property) {
            continue;
        }

        let current = actual.get(dataset, property);
        if current == Some(expected.as_str()) {
            continue;
        }

        changes.push(PropertyChange {
            dataset: dataset.to_string(),
            property: property.clone(),
            expected: Some(expected.clone()),
            actual: current.map(str::to_string),
        });
    }

    let Some(live) = actual.properties(dataset) else {
        return;
    };

    for (property, value) in live {
        if spec.is_ignored(property) || spec.properties.contains_key(property) {
            continue;
        }
        changes.push(PropertyChange::removal(dataset, property, value));
    }
}

/// Group changes by dataset, in order of first appearance
///
/// Changes for the same dataset end up in one group even when they are not
/// adjacent in the input.
pub fn group_by_dataset(changes: &[PropertyChange]) -> IndexMap<&str, Vec<&PropertyChange>> {
    let mut groups: IndexMap<&str, Vec<&PropertyChange>> = IndexMap::new();
    for change in changes {
        groups
            .entry(change.dataset.as_str())
            .or_default()
            .push(change);
    }
    groups
}

/// Diff summary statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffSummary {
    /// Number of properties to set that are not set yet
    pub additions: usize,
    /// Number of local properties to revert to inherited
    pub removals: usize,
    /// Number of properties to change
    pub modifications: usize,
    /// Number of datasets with at least one change
    pub datasets: usize,
}

impl DiffSummary {
    /// Create a summary from a list of changes
    pub fn from_changes(changes: &[PropertyChange]) -> Result<Self> {
        let mut summary = Self {
            datasets: group_by_dataset(changes).len(),
            ..Self::default()
        };
        for change in changes {
            match change.kind()? {
                ChangeKind::Addition => summary.additions += 1,
                ChangeKind::Removal => summary.removals += 1,
                ChangeKind::Modification => summary.modifications += 1,
            }
        }
        Ok(summary)
    }

    /// Total number of changes
    pub fn total(&self) -> usize {
        self.additions + self.removals + self.modifications
    }

    /// Check if there are any changes
    pub fn has_changes(&self) -> bool {
        self.total() > 0
    }
}
